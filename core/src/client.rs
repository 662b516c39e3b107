//! Request builder and response parser for the bank API.
//!
//! # Design
//! `BankClient` holds the base URL and an optional token store and nothing
//! else. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! round-trip in between belongs to a `Transport`. `BankApi` (see `api.rs`)
//! glues the three together for callers that just want typed results.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, StatusClass};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::token::TokenStore;
use crate::types::{
    ClientCreate, ClientDetail, ClientFull, ClientId, ClientSummary, ClientUpdate, Deposit,
    DepositCreate, DepositId, DepositType, DepositUpdate, EducationLevel, Job, Loan, LoanCreate,
    LoanId, LoanUpdate, MaritalStatus,
};

#[derive(Clone)]
pub struct BankClient {
    base_url: String,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl fmt::Debug for BankClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankClient")
            .field("base_url", &self.base_url)
            .field("has_token_store", &self.tokens.is_some())
            .finish()
    }
}

impl BankClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens: None,
        }
    }

    /// Attach a bearer token source; the token is read on every build.
    pub fn with_token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- clients ------------------------------------------------------------

    pub fn build_list_clients(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/clients/", None)
    }

    pub fn build_get_client(&self, id: ClientId) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/clients/{id}"), None)
    }

    pub fn build_get_client_full(&self, id: ClientId) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/clients/{id}/full"), None)
    }

    pub fn build_create_client(&self, input: &ClientCreate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/clients/", input)
    }

    pub fn build_update_client(
        &self,
        id: ClientId,
        input: &ClientUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/clients/{id}"), input)
    }

    /// `force` asks the backend to cascade to the client's loans and
    /// deposits.
    pub fn build_delete_client(&self, id: ClientId, force: bool) -> HttpRequest {
        self.request(
            HttpMethod::Delete,
            &format!("/clients/{id}?force={force}"),
            None,
        )
    }

    pub fn parse_list_clients(&self, response: HttpResponse) -> Result<Vec<ClientSummary>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_client(&self, response: HttpResponse) -> Result<ClientDetail, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_client_full(&self, response: HttpResponse) -> Result<ClientFull, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_client(&self, response: HttpResponse) -> Result<ClientSummary, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_client(&self, response: HttpResponse) -> Result<ClientDetail, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_client(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // -- references ---------------------------------------------------------

    pub fn build_list_jobs(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/references/jobs", None)
    }

    pub fn build_list_education_levels(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/references/education-levels", None)
    }

    pub fn build_list_marital_statuses(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/references/marital-statuses", None)
    }

    pub fn build_list_deposit_types(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/references/deposit-types", None)
    }

    pub fn parse_list_jobs(&self, response: HttpResponse) -> Result<Vec<Job>, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_education_levels(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<EducationLevel>, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_marital_statuses(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<MaritalStatus>, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_deposit_types(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<DepositType>, ApiError> {
        parse_json(response)
    }

    // -- loans --------------------------------------------------------------

    pub fn build_create_loan(&self, input: &LoanCreate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/finance/loans", input)
    }

    pub fn build_update_loan(&self, id: LoanId, input: &LoanUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/finance/loans/{id}"), input)
    }

    pub fn build_delete_loan(&self, id: LoanId) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/finance/loans/{id}"), None)
    }

    pub fn parse_create_loan(&self, response: HttpResponse) -> Result<Loan, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_loan(&self, response: HttpResponse) -> Result<Loan, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_loan(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // -- deposits -----------------------------------------------------------

    pub fn build_create_deposit(&self, input: &DepositCreate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/finance/deposits", input)
    }

    pub fn build_update_deposit(
        &self,
        id: DepositId,
        input: &DepositUpdate,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/finance/deposits/{id}"), input)
    }

    pub fn build_delete_deposit(&self, id: DepositId) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/finance/deposits/{id}"), None)
    }

    pub fn parse_create_deposit(&self, response: HttpResponse) -> Result<Deposit, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_deposit(&self, response: HttpResponse) -> Result<Deposit, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_deposit(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    // -- helpers ------------------------------------------------------------

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = self
            .tokens
            .as_ref()
            .and_then(|store| store.get())
            .filter(|token| !token.is_empty())
        {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(method, path, Some(body)))
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Turn a non-2xx response into an `ApiError`, logging its class.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let status = response.status;
    let class = StatusClass::of(status);
    if status >= 500 {
        tracing::error!(status, class = class.label(), body = %response.body, "request failed");
    } else {
        tracing::warn!(status, class = class.label(), body = %response.body, "request rejected");
    }
    if class == StatusClass::NotFound {
        return Err(ApiError::NotFound {
            body: response.body.clone(),
        });
    }
    Err(ApiError::Http {
        status,
        body: response.body.clone(),
    })
}
