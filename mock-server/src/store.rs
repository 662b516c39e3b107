//! In-memory bank database.
//!
//! Lookup tables are fixed at construction. Clients, loans and deposits get
//! sequential ids starting at 1 and are kept in id order.

use std::collections::BTreeMap;

use bank_core::Patch;
use chrono::NaiveDate;

use crate::error::{Checks, FieldError, ServerError};
use crate::model::{
    ClientCreate, ClientDetail, ClientFull, ClientRecord, ClientSummary, ClientUpdate, Deposit,
    DepositCreate, DepositRecord, DepositUpdate, Job, Loan, LoanCreate, LoanUpdate, Named,
};

const JOBS: &[(&str, i64)] = &[
    ("Programmer", 150_000),
    ("Manager", 80_000),
    ("Accountant", 70_000),
    ("Doctor", 100_000),
    ("Engineer", 90_000),
    ("Teacher", 50_000),
    ("Lawyer", 120_000),
    ("Designer", 85_000),
];

const EDUCATION_LEVELS: &[&str] = &[
    "Secondary",
    "Vocational",
    "Incomplete higher",
    "Bachelor",
    "Master",
];

const MARITAL_STATUSES: &[&str] = &["Single", "Married", "Divorced", "Widowed"];

const DEPOSIT_TYPES: &[&str] = &["Savings", "Term", "On demand", "Pension"];

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 256;
const AGE_MAX: i64 = 150;

#[derive(Debug)]
pub struct Store {
    jobs: Vec<Job>,
    education_levels: Vec<Named>,
    marital_statuses: Vec<Named>,
    deposit_types: Vec<Named>,
    clients: BTreeMap<i64, ClientRecord>,
    loans: BTreeMap<i64, Loan>,
    deposits: BTreeMap<i64, DepositRecord>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn named(names: &[&str]) -> Vec<Named> {
    names
        .iter()
        .zip(1..)
        .map(|(name, id)| Named {
            id,
            name: name.to_string(),
        })
        .collect()
}

impl Store {
    /// Lookup tables only; no clients.
    pub fn new() -> Self {
        Self {
            jobs: JOBS
                .iter()
                .zip(1..)
                .map(|(&(name, salary), id)| Job {
                    id,
                    name: name.to_string(),
                    salary,
                })
                .collect(),
            education_levels: named(EDUCATION_LEVELS),
            marital_statuses: named(MARITAL_STATUSES),
            deposit_types: named(DEPOSIT_TYPES),
            clients: BTreeMap::new(),
            loans: BTreeMap::new(),
            deposits: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// A handful of fixed clients with loans and deposits for manual runs.
    pub fn with_demo_data() -> Self {
        let mut store = Self::new();
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        let people: &[(&str, i64, bool, i64, i64, i64)] = &[
            ("Anna Petrova", 29, false, 1, 5, 1),
            ("Boris Orlov", 45, false, 2, 4, 2),
            ("Viktor Annenkov", 61, true, 6, 1, 4),
            ("Elena Volkova", 38, false, 4, 5, 2),
            ("Dmitry Kuznetsov", 52, false, 7, 4, 3),
            ("Maria Sokolova", 24, false, 8, 3, 1),
        ];
        for &(name, age, is_bankrupt, job_id, education_level_id, marital_status_id) in people {
            store.insert_client(ClientCreate {
                full_name: name.to_string(),
                age,
                is_bankrupt,
                job_id,
                education_level_id,
                marital_status_id,
            });
        }
        store.insert_loan(LoanCreate {
            client_id: 2,
            amount: 1_250_000.0,
            interest_rate: 14.5,
            start_date: date(2024, 3, 1),
            end_date: date(2027, 3, 1),
            is_overdue: false,
            overdue_amount: 0.0,
        });
        store.insert_loan(LoanCreate {
            client_id: 3,
            amount: 480_000.0,
            interest_rate: 21.0,
            start_date: date(2023, 9, 15),
            end_date: date(2025, 9, 15),
            is_overdue: true,
            overdue_amount: 62_400.0,
        });
        store.insert_deposit(DepositCreate {
            client_id: 1,
            type_id: 2,
            amount: 300_000.0,
            interest_rate: 8.0,
            final_amount: 324_000.0,
            start_date: date(2024, 6, 1),
            end_date: date(2025, 6, 1),
        });
        store.insert_deposit(DepositCreate {
            client_id: 4,
            type_id: 1,
            amount: 150_000.0,
            interest_rate: 6.5,
            final_amount: 159_750.0,
            start_date: date(2024, 1, 10),
            end_date: date(2025, 1, 10),
        });
        store
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // -- references ---------------------------------------------------------

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn education_levels(&self) -> &[Named] {
        &self.education_levels
    }

    pub fn marital_statuses(&self) -> &[Named] {
        &self.marital_statuses
    }

    pub fn deposit_types(&self) -> &[Named] {
        &self.deposit_types
    }

    fn job(&self, id: i64) -> Result<&Job, ServerError> {
        self.jobs.iter().find(|j| j.id == id).ok_or(ServerError::NotFound("Job"))
    }

    fn lookup<'a>(table: &'a [Named], id: i64, entity: &'static str) -> Result<&'a Named, ServerError> {
        table.iter().find(|n| n.id == id).ok_or(ServerError::NotFound(entity))
    }

    // -- clients ------------------------------------------------------------

    fn summary(&self, record: &ClientRecord) -> Result<ClientSummary, ServerError> {
        Ok(ClientSummary {
            id: record.id,
            full_name: record.full_name.clone(),
            age: record.age,
            is_bankrupt: record.is_bankrupt,
            job: self.job(record.job_id)?.clone(),
        })
    }

    fn detail(&self, record: &ClientRecord) -> Result<ClientDetail, ServerError> {
        Ok(ClientDetail {
            summary: self.summary(record)?,
            education_level: Self::lookup(&self.education_levels, record.education_level_id, "Education level")?
                .clone(),
            marital_status: Self::lookup(&self.marital_statuses, record.marital_status_id, "Marital status")?
                .clone(),
        })
    }

    fn client(&self, id: i64) -> Result<&ClientRecord, ServerError> {
        self.clients.get(&id).ok_or(ServerError::NotFound("Client"))
    }

    pub fn list_clients(&self) -> Result<Vec<ClientSummary>, ServerError> {
        self.clients.values().map(|c| self.summary(c)).collect()
    }

    pub fn get_client(&self, id: i64) -> Result<ClientDetail, ServerError> {
        self.detail(self.client(id)?)
    }

    pub fn get_client_full(&self, id: i64) -> Result<ClientFull, ServerError> {
        let detail = self.detail(self.client(id)?)?;
        let loans = self
            .loans
            .values()
            .filter(|loan| loan.client_id == id)
            .cloned()
            .collect();
        let deposits = self
            .deposits
            .values()
            .filter(|deposit| deposit.client_id == id)
            .map(|deposit| self.deposit_view(deposit))
            .collect::<Result<_, _>>()?;
        Ok(ClientFull {
            detail,
            loans,
            deposits,
        })
    }

    pub fn create_client(&mut self, input: ClientCreate) -> Result<ClientDetail, ServerError> {
        let mut checks = Checks::default();
        check_name(&mut checks, &input.full_name);
        check_age(&mut checks, input.age);
        self.check_job(&mut checks, input.job_id);
        self.check_education(&mut checks, input.education_level_id);
        self.check_marital_status(&mut checks, input.marital_status_id);
        checks.finish()?;

        let id = self.insert_client(input);
        tracing::info!(id, "client created");
        self.get_client(id)
    }

    fn insert_client(&mut self, input: ClientCreate) -> i64 {
        let id = self.next_id();
        self.clients.insert(
            id,
            ClientRecord {
                id,
                full_name: input.full_name.trim().to_string(),
                age: input.age,
                is_bankrupt: input.is_bankrupt,
                job_id: input.job_id,
                education_level_id: input.education_level_id,
                marital_status_id: input.marital_status_id,
            },
        );
        id
    }

    pub fn update_client(&mut self, id: i64, input: ClientUpdate) -> Result<ClientDetail, ServerError> {
        self.client(id)?;
        let mut checks = Checks::default();
        forbid_clear(&mut checks, "full_name", &input.full_name);
        forbid_clear(&mut checks, "age", &input.age);
        forbid_clear(&mut checks, "is_bankrupt", &input.is_bankrupt);
        forbid_clear(&mut checks, "job_id", &input.job_id);
        forbid_clear(&mut checks, "education_level_id", &input.education_level_id);
        forbid_clear(&mut checks, "marital_status_id", &input.marital_status_id);
        if let Some(name) = input.full_name.as_set() {
            check_name(&mut checks, name);
        }
        if let Some(&age) = input.age.as_set() {
            check_age(&mut checks, age);
        }
        if let Some(&job_id) = input.job_id.as_set() {
            self.check_job(&mut checks, job_id);
        }
        if let Some(&level) = input.education_level_id.as_set() {
            self.check_education(&mut checks, level);
        }
        if let Some(&status) = input.marital_status_id.as_set() {
            self.check_marital_status(&mut checks, status);
        }
        checks.finish()?;

        let record = self.clients.get_mut(&id).ok_or(ServerError::NotFound("Client"))?;
        input
            .full_name
            .map(|name| name.trim().to_string())
            .apply(&mut record.full_name);
        input.age.apply(&mut record.age);
        input.is_bankrupt.apply(&mut record.is_bankrupt);
        input.job_id.apply(&mut record.job_id);
        input.education_level_id.apply(&mut record.education_level_id);
        input.marital_status_id.apply(&mut record.marital_status_id);
        tracing::info!(id, "client updated");
        self.get_client(id)
    }

    /// Without `force` a client that still owns loans or deposits is kept.
    pub fn delete_client(&mut self, id: i64, force: bool) -> Result<(), ServerError> {
        self.client(id)?;
        let owns_anything = self.loans.values().any(|l| l.client_id == id)
            || self.deposits.values().any(|d| d.client_id == id);
        if owns_anything && !force {
            return Err(ServerError::Conflict(
                "Client has loans or deposits; use force=true".to_string(),
            ));
        }
        self.loans.retain(|_, loan| loan.client_id != id);
        self.deposits.retain(|_, deposit| deposit.client_id != id);
        self.clients.remove(&id);
        tracing::info!(id, force, "client deleted");
        Ok(())
    }

    fn check_job(&self, checks: &mut Checks, id: i64) {
        if self.job(id).is_err() {
            checks.push(unknown_reference("job_id", "job", id));
        }
    }

    fn check_education(&self, checks: &mut Checks, id: i64) {
        if Self::lookup(&self.education_levels, id, "Education level").is_err() {
            checks.push(unknown_reference("education_level_id", "education level", id));
        }
    }

    fn check_marital_status(&self, checks: &mut Checks, id: i64) {
        if Self::lookup(&self.marital_statuses, id, "Marital status").is_err() {
            checks.push(unknown_reference("marital_status_id", "marital status", id));
        }
    }

    // -- loans --------------------------------------------------------------

    pub fn create_loan(&mut self, input: LoanCreate) -> Result<Loan, ServerError> {
        self.client(input.client_id)?;
        let id = self.insert_loan(input);
        tracing::info!(id, "loan created");
        self.loans.get(&id).cloned().ok_or(ServerError::NotFound("Loan"))
    }

    fn insert_loan(&mut self, input: LoanCreate) -> i64 {
        let id = self.next_id();
        self.loans.insert(
            id,
            Loan {
                id,
                client_id: input.client_id,
                amount: input.amount,
                interest_rate: input.interest_rate,
                is_overdue: input.is_overdue,
                overdue_amount: input.overdue_amount,
                start_date: input.start_date,
                end_date: input.end_date,
            },
        );
        id
    }

    pub fn update_loan(&mut self, id: i64, input: LoanUpdate) -> Result<Loan, ServerError> {
        let loan = self.loans.get_mut(&id).ok_or(ServerError::NotFound("Loan"))?;
        let mut checks = Checks::default();
        forbid_clear(&mut checks, "amount", &input.amount);
        forbid_clear(&mut checks, "interest_rate", &input.interest_rate);
        forbid_clear(&mut checks, "start_date", &input.start_date);
        forbid_clear(&mut checks, "end_date", &input.end_date);
        forbid_clear(&mut checks, "is_overdue", &input.is_overdue);
        forbid_clear(&mut checks, "overdue_amount", &input.overdue_amount);
        checks.finish()?;

        input.amount.apply(&mut loan.amount);
        input.interest_rate.apply(&mut loan.interest_rate);
        input.start_date.apply(&mut loan.start_date);
        input.end_date.apply(&mut loan.end_date);
        input.is_overdue.apply(&mut loan.is_overdue);
        input.overdue_amount.apply(&mut loan.overdue_amount);
        tracing::info!(id, "loan updated");
        Ok(loan.clone())
    }

    pub fn delete_loan(&mut self, id: i64) -> Result<(), ServerError> {
        self.loans.remove(&id).map(drop).ok_or(ServerError::NotFound("Loan"))
    }

    // -- deposits -----------------------------------------------------------

    fn deposit_view(&self, record: &DepositRecord) -> Result<Deposit, ServerError> {
        Ok(Deposit {
            id: record.id,
            client_id: record.client_id,
            deposit_type: Self::lookup(&self.deposit_types, record.type_id, "Deposit type")?.clone(),
            amount: record.amount,
            interest_rate: record.interest_rate,
            final_amount: record.final_amount,
            start_date: record.start_date,
            end_date: record.end_date,
        })
    }

    fn check_deposit_type(&self, checks: &mut Checks, id: i64) {
        if Self::lookup(&self.deposit_types, id, "Deposit type").is_err() {
            checks.push(unknown_reference("type_id", "deposit type", id));
        }
    }

    pub fn create_deposit(&mut self, input: DepositCreate) -> Result<Deposit, ServerError> {
        self.client(input.client_id)?;
        let mut checks = Checks::default();
        self.check_deposit_type(&mut checks, input.type_id);
        checks.finish()?;

        let id = self.insert_deposit(input);
        tracing::info!(id, "deposit created");
        self.get_deposit(id)
    }

    fn insert_deposit(&mut self, input: DepositCreate) -> i64 {
        let id = self.next_id();
        self.deposits.insert(
            id,
            DepositRecord {
                id,
                client_id: input.client_id,
                type_id: input.type_id,
                amount: input.amount,
                interest_rate: input.interest_rate,
                final_amount: input.final_amount,
                start_date: input.start_date,
                end_date: input.end_date,
            },
        );
        id
    }

    fn get_deposit(&self, id: i64) -> Result<Deposit, ServerError> {
        let record = self.deposits.get(&id).ok_or(ServerError::NotFound("Deposit"))?;
        self.deposit_view(record)
    }

    pub fn update_deposit(&mut self, id: i64, input: DepositUpdate) -> Result<Deposit, ServerError> {
        if !self.deposits.contains_key(&id) {
            return Err(ServerError::NotFound("Deposit"));
        }
        let mut checks = Checks::default();
        forbid_clear(&mut checks, "type_id", &input.type_id);
        forbid_clear(&mut checks, "amount", &input.amount);
        forbid_clear(&mut checks, "interest_rate", &input.interest_rate);
        forbid_clear(&mut checks, "final_amount", &input.final_amount);
        forbid_clear(&mut checks, "start_date", &input.start_date);
        forbid_clear(&mut checks, "end_date", &input.end_date);
        if let Some(&type_id) = input.type_id.as_set() {
            self.check_deposit_type(&mut checks, type_id);
        }
        checks.finish()?;

        let deposit = self.deposits.get_mut(&id).ok_or(ServerError::NotFound("Deposit"))?;
        input.type_id.apply(&mut deposit.type_id);
        input.amount.apply(&mut deposit.amount);
        input.interest_rate.apply(&mut deposit.interest_rate);
        input.final_amount.apply(&mut deposit.final_amount);
        input.start_date.apply(&mut deposit.start_date);
        input.end_date.apply(&mut deposit.end_date);
        tracing::info!(id, "deposit updated");
        self.get_deposit(id)
    }

    pub fn delete_deposit(&mut self, id: i64) -> Result<(), ServerError> {
        self.deposits
            .remove(&id)
            .map(drop)
            .ok_or(ServerError::NotFound("Deposit"))
    }
}

fn check_name(checks: &mut Checks, name: &str) {
    let len = name.trim().chars().count();
    if len < NAME_MIN {
        checks.push(FieldError::body(
            "full_name",
            format!("String should have at least {NAME_MIN} characters"),
            "string_too_short",
        ));
    } else if len > NAME_MAX {
        checks.push(FieldError::body(
            "full_name",
            format!("String should have at most {NAME_MAX} characters"),
            "string_too_long",
        ));
    }
}

fn check_age(checks: &mut Checks, age: i64) {
    if age < 0 {
        checks.push(FieldError::body(
            "age",
            "Input should be greater than or equal to 0",
            "greater_than_equal",
        ));
    } else if age > AGE_MAX {
        checks.push(FieldError::body(
            "age",
            format!("Input should be less than or equal to {AGE_MAX}"),
            "less_than_equal",
        ));
    }
}

/// Every stored column is required, so an explicit `null` is refused.
fn forbid_clear<T>(checks: &mut Checks, field: &str, patch: &Patch<T>) {
    if patch.is_clear() {
        checks.push(FieldError::body(field, "Input should not be null", "none_forbidden"));
    }
}

fn unknown_reference(field: &str, what: &str, id: i64) -> FieldError {
    FieldError::body(field, format!("Unknown {what} id {id}"), "value_error")
}
