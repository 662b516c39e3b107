//! Wire shapes served by the mock backend.

use bank_core::Patch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub name: String,
    pub salary: i64,
}

/// Plain `{id, name}` lookup row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Named {
    pub id: i64,
    pub name: String,
}

/// Stored client row; references are kept as ids and expanded on read.
#[derive(Clone, Debug)]
pub struct ClientRecord {
    pub id: i64,
    pub full_name: String,
    pub age: i64,
    pub is_bankrupt: bool,
    pub job_id: i64,
    pub education_level_id: i64,
    pub marital_status_id: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: i64,
    pub full_name: String,
    pub age: i64,
    pub is_bankrupt: bool,
    pub job: Job,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub summary: ClientSummary,
    pub education_level: Named,
    pub marital_status: Named,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientFull {
    #[serde(flatten)]
    pub detail: ClientDetail,
    pub loans: Vec<Loan>,
    pub deposits: Vec<Deposit>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClientCreate {
    pub full_name: String,
    pub age: i64,
    #[serde(default)]
    pub is_bankrupt: bool,
    pub job_id: i64,
    pub education_level_id: i64,
    pub marital_status_id: i64,
}

/// A missing key leaves the value as is; `null` is a [`Patch::Clear`],
/// which the store rejects for these required columns.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClientUpdate {
    #[serde(default)]
    pub full_name: Patch<String>,
    #[serde(default)]
    pub age: Patch<i64>,
    #[serde(default)]
    pub is_bankrupt: Patch<bool>,
    #[serde(default)]
    pub job_id: Patch<i64>,
    #[serde(default)]
    pub education_level_id: Patch<i64>,
    #[serde(default)]
    pub marital_status_id: Patch<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub client_id: i64,
    pub amount: f64,
    pub interest_rate: f64,
    pub is_overdue: bool,
    pub overdue_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoanCreate {
    pub client_id: i64,
    pub amount: f64,
    pub interest_rate: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default)]
    pub overdue_amount: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoanUpdate {
    #[serde(default)]
    pub amount: Patch<f64>,
    #[serde(default)]
    pub interest_rate: Patch<f64>,
    #[serde(default)]
    pub start_date: Patch<NaiveDate>,
    #[serde(default)]
    pub end_date: Patch<NaiveDate>,
    #[serde(default)]
    pub is_overdue: Patch<bool>,
    #[serde(default)]
    pub overdue_amount: Patch<f64>,
}

#[derive(Clone, Debug)]
pub struct DepositRecord {
    pub id: i64,
    pub client_id: i64,
    pub type_id: i64,
    pub amount: f64,
    pub interest_rate: f64,
    pub final_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: i64,
    pub client_id: i64,
    #[serde(rename = "type")]
    pub deposit_type: Named,
    pub amount: f64,
    pub interest_rate: f64,
    pub final_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DepositCreate {
    pub client_id: i64,
    pub type_id: i64,
    pub amount: f64,
    pub interest_rate: f64,
    pub final_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DepositUpdate {
    #[serde(default)]
    pub type_id: Patch<i64>,
    #[serde(default)]
    pub amount: Patch<f64>,
    #[serde(default)]
    pub interest_rate: Patch<f64>,
    #[serde(default)]
    pub final_amount: Patch<f64>,
    #[serde(default)]
    pub start_date: Patch<NaiveDate>,
    #[serde(default)]
    pub end_date: Patch<NaiveDate>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub force: bool,
}
