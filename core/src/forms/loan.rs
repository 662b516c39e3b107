use chrono::{Local, Months, NaiveDate};

use crate::api::BankApi;
use crate::error::ApiError;
use crate::fetch::Invalidation;
use crate::patch::Patch;
use crate::transport::Transport;
use crate::types::{ClientId, Loan, LoanCreate, LoanId, LoanUpdate};

use super::{non_negative, FormModal, FormMode, FormSpec, ValidationError};

pub type LoanForm = FormModal<LoanFormSpec>;

const DEFAULT_AMOUNT: f64 = 100_000.0;
const DEFAULT_RATE: f64 = 12.5;

#[derive(Debug, Clone, PartialEq)]
pub struct LoanFields {
    pub amount: f64,
    pub interest_rate: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    is_overdue: bool,
    overdue_amount: f64,
}

impl LoanFields {
    pub fn is_overdue(&self) -> bool {
        self.is_overdue
    }

    /// The overdue amount input only exists while the loan is flagged.
    pub fn overdue_amount_visible(&self) -> bool {
        self.is_overdue
    }

    pub fn set_overdue(&mut self, overdue: bool) {
        self.is_overdue = overdue;
    }

    /// Value as typed; kept while the box is unchecked so re-checking
    /// restores it.
    pub fn overdue_amount(&self) -> f64 {
        self.overdue_amount
    }

    pub fn set_overdue_amount(&mut self, amount: f64) {
        self.overdue_amount = amount;
    }

    /// What gets sent: zero unless the loan is overdue.
    pub fn submitted_overdue_amount(&self) -> f64 {
        if self.is_overdue {
            self.overdue_amount
        } else {
            0.0
        }
    }

    fn to_create(&self, client_id: ClientId) -> LoanCreate {
        LoanCreate {
            client_id,
            amount: self.amount,
            interest_rate: self.interest_rate,
            start_date: self.start_date,
            end_date: self.end_date,
            is_overdue: self.is_overdue,
            overdue_amount: self.submitted_overdue_amount(),
        }
    }

    fn to_update(&self) -> LoanUpdate {
        LoanUpdate {
            amount: Patch::Set(self.amount),
            interest_rate: Patch::Set(self.interest_rate),
            start_date: Patch::Set(self.start_date),
            end_date: Patch::Set(self.end_date),
            is_overdue: Patch::Set(self.is_overdue),
            overdue_amount: Patch::Set(self.submitted_overdue_amount()),
        }
    }
}

impl From<&Loan> for LoanFields {
    fn from(loan: &Loan) -> Self {
        Self {
            amount: loan.amount,
            interest_rate: loan.interest_rate,
            start_date: loan.start_date,
            end_date: loan.end_date,
            is_overdue: loan.is_overdue,
            overdue_amount: if loan.is_overdue { loan.overdue_amount } else { 0.0 },
        }
    }
}

/// Loan modal bound to one client.
#[derive(Debug, Clone)]
pub struct LoanFormSpec {
    client_id: ClientId,
    today: NaiveDate,
}

impl LoanFormSpec {
    pub fn new(client_id: ClientId) -> Self {
        Self::with_today(client_id, Local::now().date_naive())
    }

    pub fn with_today(client_id: ClientId, today: NaiveDate) -> Self {
        Self { client_id, today }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }
}

impl FormSpec for LoanFormSpec {
    type Key = LoanId;
    type Fields = LoanFields;
    type References = ();

    const ENTITY: &'static str = "loan";

    fn defaults(&self) -> LoanFields {
        LoanFields {
            amount: DEFAULT_AMOUNT,
            interest_rate: DEFAULT_RATE,
            start_date: self.today,
            end_date: self
                .today
                .checked_add_months(Months::new(12))
                .unwrap_or(self.today),
            is_overdue: false,
            overdue_amount: 0.0,
        }
    }

    fn load_references<T: Transport>(&self, _api: &BankApi<T>) -> Result<(), ApiError> {
        Ok(())
    }

    /// There is no single-loan endpoint; the owner's full view is the
    /// authoritative source.
    fn load_existing<T: Transport>(&self, api: &BankApi<T>, key: LoanId) -> Result<LoanFields, ApiError> {
        let full = api.get_client_full(self.client_id)?;
        full.loan(key).map(LoanFields::from).ok_or_else(|| ApiError::NotFound {
            body: "Loan not found".to_string(),
        })
    }

    fn validate(&self, fields: &LoanFields) -> Result<(), ValidationError> {
        non_negative(fields.amount, "Amount")?;
        non_negative(fields.interest_rate, "Interest rate")?;
        non_negative(fields.submitted_overdue_amount(), "Overdue amount")?;
        Ok(())
    }

    fn create<T: Transport>(&self, api: &BankApi<T>, fields: &LoanFields) -> Result<(), ApiError> {
        api.create_loan(&fields.to_create(self.client_id)).map(drop)
    }

    fn update<T: Transport>(&self, api: &BankApi<T>, key: LoanId, fields: &LoanFields) -> Result<(), ApiError> {
        api.update_loan(key, &fields.to_update()).map(drop)
    }

    fn invalidation(&self, _mode: FormMode<LoanId>) -> Invalidation {
        Invalidation::ClientFull(self.client_id)
    }
}
