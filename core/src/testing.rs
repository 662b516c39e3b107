//! Scripted transport and fixtures for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::api::BankApi;
use crate::client::BankClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const BASE: &str = "http://bank.test/api/v1";

struct Script {
    method: HttpMethod,
    path: String,
    replies: VecDeque<Result<HttpResponse, ApiError>>,
}

/// Answers by (method, path). Queued replies are consumed in order; the last
/// one keeps answering. Unscripted calls get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: RefCell<Vec<Script>>,
    calls: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        let body = if body.is_null() { String::new() } else { body.to_string() };
        self.push(method, path, Ok(HttpResponse::new(status, body)))
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: ApiError) -> &Self {
        self.push(method, path, Err(error))
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Result<HttpResponse, ApiError>) -> &Self {
        let mut scripts = self.scripts.borrow_mut();
        match scripts
            .iter_mut()
            .find(|s| s.method == method && s.path == path)
        {
            Some(script) => script.replies.push_back(reply),
            None => scripts.push(Script {
                method,
                path: path.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{BASE}{path}");
        self.calls
            .borrow()
            .iter()
            .filter(|req| req.method == method && req.url == url)
            .count()
    }

    pub fn mutations(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|req| req.method != HttpMethod::Get)
            .count()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.calls.borrow_mut().push(request.clone());
        let path = request.url.strip_prefix(BASE).unwrap_or(&request.url);
        let mut scripts = self.scripts.borrow_mut();
        let Some(script) = scripts
            .iter_mut()
            .find(|s| s.method == request.method && s.path == path)
        else {
            return Ok(HttpResponse::new(404, r#"{"detail":"Not Found"}"#));
        };
        if script.replies.len() > 1 {
            script.replies.pop_front().unwrap_or_else(|| Err(ApiError::Timeout))
        } else {
            script.replies.front().cloned().unwrap_or_else(|| Err(ApiError::Timeout))
        }
    }
}

pub fn api(transport: &ScriptedTransport) -> BankApi<&ScriptedTransport> {
    BankApi::new(BankClient::new(BASE), transport)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn jobs() -> Value {
    json!([
        {"id": 1, "name": "Engineer", "salary": 90000},
        {"id": 2, "name": "Teacher", "salary": 50000}
    ])
}

pub fn education_levels() -> Value {
    json!([{"id": 1, "name": "Secondary"}, {"id": 2, "name": "Master"}])
}

pub fn marital_statuses() -> Value {
    json!([{"id": 1, "name": "Single"}, {"id": 2, "name": "Married"}])
}

pub fn deposit_types() -> Value {
    json!([{"id": 1, "name": "Savings"}, {"id": 2, "name": "Term"}])
}

/// Script all four lookup endpoints.
pub fn with_references(transport: &ScriptedTransport) {
    transport
        .reply(HttpMethod::Get, "/references/jobs", 200, jobs())
        .reply(HttpMethod::Get, "/references/education-levels", 200, education_levels())
        .reply(HttpMethod::Get, "/references/marital-statuses", 200, marital_statuses())
        .reply(HttpMethod::Get, "/references/deposit-types", 200, deposit_types());
}

pub fn client_detail(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "full_name": name,
        "age": 41,
        "is_bankrupt": false,
        "job": {"id": 1, "name": "Engineer", "salary": 90000},
        "education_level": {"id": 2, "name": "Master"},
        "marital_status": {"id": 2, "name": "Married"}
    })
}

pub fn loan(id: i64, client_id: i64, amount: f64, overdue: Option<f64>) -> Value {
    json!({
        "id": id,
        "client_id": client_id,
        "amount": amount,
        "interest_rate": 11.0,
        "is_overdue": overdue.is_some(),
        "overdue_amount": overdue.unwrap_or(0.0),
        "start_date": "2024-02-01",
        "end_date": "2026-02-01"
    })
}

pub fn deposit(id: i64, client_id: i64, amount: f64) -> Value {
    json!({
        "id": id,
        "client_id": client_id,
        "type": {"id": 2, "name": "Term"},
        "amount": amount,
        "interest_rate": 7.5,
        "final_amount": amount * 1.075,
        "start_date": "2024-05-01",
        "end_date": "2025-05-01"
    })
}

pub fn client_full(id: i64, name: &str, loans: Vec<Value>, deposits: Vec<Value>) -> Value {
    let mut full = client_detail(id, name);
    full["loans"] = Value::Array(loans);
    full["deposits"] = Value::Array(deposits);
    full
}

pub fn summary(id: i64, name: &str, age: u32, salary: i64) -> Value {
    json!({
        "id": id,
        "full_name": name,
        "age": age,
        "is_bankrupt": false,
        "job": {"id": 1, "name": "Engineer", "salary": salary}
    })
}
