//! DTOs for the bank API.
//!
//! # Design
//! These mirror the backend schema but are defined independently of the
//! mock-server crate; the integration tests catch drift between the two.
//! Update payloads are sparse (`Patch` per field) so an omitted field is
//! never confused with one that should be cleared.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::patch::Patch;

pub type ClientId = i64;
pub type LoanId = i64;
pub type DepositId = i64;
pub type ReferenceId = i64;

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: ReferenceId,
    pub name: String,
    pub salary: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationLevel {
    pub id: ReferenceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaritalStatus {
    pub id: ReferenceId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositType {
    pub id: ReferenceId,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// Row of `GET /clients/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: ClientId,
    pub full_name: String,
    pub age: u32,
    pub is_bankrupt: bool,
    pub job: Job,
}

/// `GET /clients/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDetail {
    pub id: ClientId,
    pub full_name: String,
    pub age: u32,
    pub is_bankrupt: bool,
    pub job: Job,
    pub education_level: EducationLevel,
    pub marital_status: MaritalStatus,
}

/// `GET /clients/{id}/full`: the detail record plus everything the client
/// owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientFull {
    #[serde(flatten)]
    pub client: ClientDetail,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub deposits: Vec<Deposit>,
}

impl ClientFull {
    pub fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.id == id)
    }

    pub fn deposit(&self, id: DepositId) -> Option<&Deposit> {
        self.deposits.iter().find(|deposit| deposit.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientCreate {
    pub full_name: String,
    pub age: u32,
    #[serde(default)]
    pub is_bankrupt: bool,
    pub job_id: ReferenceId,
    pub education_level_id: ReferenceId,
    pub marital_status_id: ReferenceId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub full_name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub age: Patch<u32>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub is_bankrupt: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub job_id: Patch<ReferenceId>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub education_level_id: Patch<ReferenceId>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub marital_status_id: Patch<ReferenceId>,
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub client_id: ClientId,
    pub amount: f64,
    pub interest_rate: f64,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default)]
    pub overdue_amount: f64,
    #[serde(deserialize_with = "lenient_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCreate {
    pub client_id: ClientId,
    pub amount: f64,
    pub interest_rate: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default)]
    pub overdue_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub amount: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub interest_rate: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub start_date: Patch<NaiveDate>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub end_date: Patch<NaiveDate>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub is_overdue: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub overdue_amount: Patch<f64>,
}

// ---------------------------------------------------------------------------
// Deposits
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub client_id: ClientId,
    #[serde(rename = "type")]
    pub deposit_type: DepositType,
    pub amount: f64,
    pub interest_rate: f64,
    pub final_amount: f64,
    #[serde(deserialize_with = "lenient_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositCreate {
    pub client_id: ClientId,
    pub type_id: ReferenceId,
    pub amount: f64,
    pub interest_rate: f64,
    pub final_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositUpdate {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub type_id: Patch<ReferenceId>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub amount: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub interest_rate: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub final_amount: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub start_date: Patch<NaiveDate>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub end_date: Patch<NaiveDate>,
}

/// Accepts `YYYY-MM-DD` as well as a datetime whose date part comes first
/// (`YYYY-MM-DDTHH:MM:SS`).
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let date_part = raw.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_full_flattens_detail_fields() {
        let json = r#"{
            "id": 7, "full_name": "Anna Petrova", "age": 34, "is_bankrupt": false,
            "job": {"id": 1, "name": "Engineer", "salary": 90000},
            "education_level": {"id": 2, "name": "Master"},
            "marital_status": {"id": 1, "name": "Single"},
            "loans": [{"id": 3, "client_id": 7, "amount": 1000.0, "interest_rate": 9.5,
                       "is_overdue": true, "overdue_amount": 150.0,
                       "start_date": "2024-01-01", "end_date": "2025-01-01T00:00:00"}],
            "deposits": []
        }"#;
        let full: ClientFull = serde_json::from_str(json).unwrap();
        assert_eq!(full.client.full_name, "Anna Petrova");
        assert_eq!(full.client.job.salary, 90000);
        assert_eq!(full.loans.len(), 1);
        assert_eq!(full.loan(3).unwrap().end_date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(full.deposit(3).is_none());
    }

    #[test]
    fn deposit_type_is_renamed_on_the_wire() {
        let json = r#"{"id": 1, "client_id": 7, "type": {"id": 2, "name": "Term"},
            "amount": 50000.0, "interest_rate": 8.0, "final_amount": 54000.0,
            "start_date": "2024-03-01", "end_date": "2025-03-01"}"#;
        let deposit: Deposit = serde_json::from_str(json).unwrap();
        assert_eq!(deposit.deposit_type.name, "Term");
        let back = serde_json::to_value(&deposit).unwrap();
        assert_eq!(back["type"]["id"], 2);
        assert_eq!(back["start_date"], "2024-03-01");
    }

    #[test]
    fn loan_update_only_sends_present_fields() {
        let update = LoanUpdate {
            amount: Patch::Set(2500.0),
            is_overdue: Patch::Set(false),
            ..LoanUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"amount": 2500.0, "is_overdue": false}));
    }

    #[test]
    fn rejects_malformed_dates() {
        let json = r#"{"id": 1, "client_id": 7, "amount": 1.0, "interest_rate": 1.0,
            "start_date": "01/02/2024", "end_date": "2024-02-01"}"#;
        assert!(serde_json::from_str::<Loan>(json).is_err());
    }
}
