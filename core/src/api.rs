//! Typed call sites over `BankClient` + `Transport`.

use crate::client::BankClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{
    ClientCreate, ClientDetail, ClientFull, ClientId, ClientSummary, ClientUpdate, Deposit,
    DepositCreate, DepositId, DepositType, DepositUpdate, EducationLevel, Job, Loan, LoanCreate,
    LoanId, LoanUpdate, MaritalStatus,
};

#[derive(Debug, Clone)]
pub struct BankApi<T> {
    client: BankClient,
    transport: T,
}

impl<T: Transport> BankApi<T> {
    pub fn new(client: BankClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BankClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "api request");
        let response = self.transport.execute(&request)?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            "api response"
        );
        Ok(response)
    }

    pub fn list_clients(&self) -> Result<Vec<ClientSummary>, ApiError> {
        let response = self.execute(self.client.build_list_clients())?;
        self.client.parse_list_clients(response)
    }

    pub fn get_client(&self, id: ClientId) -> Result<ClientDetail, ApiError> {
        let response = self.execute(self.client.build_get_client(id))?;
        self.client.parse_get_client(response)
    }

    pub fn get_client_full(&self, id: ClientId) -> Result<ClientFull, ApiError> {
        let response = self.execute(self.client.build_get_client_full(id))?;
        self.client.parse_get_client_full(response)
    }

    pub fn create_client(&self, input: &ClientCreate) -> Result<ClientSummary, ApiError> {
        let response = self.execute(self.client.build_create_client(input)?)?;
        self.client.parse_create_client(response)
    }

    pub fn update_client(&self, id: ClientId, input: &ClientUpdate) -> Result<ClientDetail, ApiError> {
        let response = self.execute(self.client.build_update_client(id, input)?)?;
        self.client.parse_update_client(response)
    }

    pub fn delete_client(&self, id: ClientId, force: bool) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_client(id, force))?;
        self.client.parse_delete_client(response)
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let response = self.execute(self.client.build_list_jobs())?;
        self.client.parse_list_jobs(response)
    }

    pub fn list_education_levels(&self) -> Result<Vec<EducationLevel>, ApiError> {
        let response = self.execute(self.client.build_list_education_levels())?;
        self.client.parse_list_education_levels(response)
    }

    pub fn list_marital_statuses(&self) -> Result<Vec<MaritalStatus>, ApiError> {
        let response = self.execute(self.client.build_list_marital_statuses())?;
        self.client.parse_list_marital_statuses(response)
    }

    pub fn list_deposit_types(&self) -> Result<Vec<DepositType>, ApiError> {
        let response = self.execute(self.client.build_list_deposit_types())?;
        self.client.parse_list_deposit_types(response)
    }

    pub fn create_loan(&self, input: &LoanCreate) -> Result<Loan, ApiError> {
        let response = self.execute(self.client.build_create_loan(input)?)?;
        self.client.parse_create_loan(response)
    }

    pub fn update_loan(&self, id: LoanId, input: &LoanUpdate) -> Result<Loan, ApiError> {
        let response = self.execute(self.client.build_update_loan(id, input)?)?;
        self.client.parse_update_loan(response)
    }

    pub fn delete_loan(&self, id: LoanId) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_loan(id))?;
        self.client.parse_delete_loan(response)
    }

    pub fn create_deposit(&self, input: &DepositCreate) -> Result<Deposit, ApiError> {
        let response = self.execute(self.client.build_create_deposit(input)?)?;
        self.client.parse_create_deposit(response)
    }

    pub fn update_deposit(&self, id: DepositId, input: &DepositUpdate) -> Result<Deposit, ApiError> {
        let response = self.execute(self.client.build_update_deposit(id, input)?)?;
        self.client.parse_update_deposit(response)
    }

    pub fn delete_deposit(&self, id: DepositId) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete_deposit(id))?;
        self.client.parse_delete_deposit(response)
    }
}
