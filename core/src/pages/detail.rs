//! Client detail page.
//!
//! # Design
//! The page owns one `ClientFull` aggregate and never edits it in place.
//! Every successful mutation, whether it came from one of the three modals
//! or from the delete dialog, ends in a full reload of
//! `GET /clients/{id}/full`. Deleting the client itself cascades on the
//! backend (`force=true`) and sends the user back to the list.

use chrono::NaiveDate;

use crate::api::BankApi;
use crate::error::ApiError;
use crate::fetch::{Generation, Invalidation, Ticket};
use crate::forms::{
    ClientForm, ClientFormSpec, DepositForm, DepositFormSpec, FormError, LoanForm, LoanFormSpec,
};
use crate::message::error_message;
use crate::routes::Route;
use crate::transport::Transport;
use crate::types::{ClientFull, ClientId, DepositId, LoanId};

use super::PageOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Client,
    Loan(LoanId),
    Deposit(DepositId),
}

/// State of the shared "are you sure?" dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteConfirmation {
    pub target: DeleteTarget,
    pub label: String,
    pub error: Option<String>,
}

impl DeleteConfirmation {
    pub fn prompt(&self) -> String {
        match self.target {
            DeleteTarget::Client => format!(
                "Delete {}? All of their loans and deposits will be deleted too.",
                self.label
            ),
            DeleteTarget::Loan(_) | DeleteTarget::Deposit(_) => format!("Delete {}?", self.label),
        }
    }
}

#[derive(Debug)]
pub struct ClientDetailPage {
    client_id: ClientId,
    client: Option<ClientFull>,
    loading: bool,
    error: Option<String>,
    generation: Generation,
    client_form: ClientForm,
    loan_form: LoanForm,
    deposit_form: DepositForm,
    delete: Option<DeleteConfirmation>,
}

impl ClientDetailPage {
    pub fn new(client_id: ClientId) -> Self {
        Self::with_forms(
            client_id,
            LoanForm::new(LoanFormSpec::new(client_id)),
            DepositForm::new(DepositFormSpec::new(client_id)),
        )
    }

    /// Pin "today" for the loan and deposit defaults.
    pub fn with_today(client_id: ClientId, today: NaiveDate) -> Self {
        Self::with_forms(
            client_id,
            LoanForm::new(LoanFormSpec::with_today(client_id, today)),
            DepositForm::new(DepositFormSpec::with_today(client_id, today)),
        )
    }

    fn with_forms(client_id: ClientId, loan_form: LoanForm, deposit_form: DepositForm) -> Self {
        Self {
            client_id,
            client: None,
            loading: false,
            error: None,
            generation: Generation::new(),
            client_form: ClientForm::new(ClientFormSpec),
            loan_form,
            deposit_form,
            delete: None,
        }
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn client(&self) -> Option<&ClientFull> {
        self.client.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -- aggregate ----------------------------------------------------------

    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.generation.begin()
    }

    /// Returns false when the result was superseded and dropped.
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<ClientFull, ApiError>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(client_id = self.client_id, "discarding stale client view");
            return false;
        }
        self.loading = false;
        match result {
            Ok(full) => {
                self.client = Some(full);
                self.error = None;
            }
            Err(e) => {
                tracing::error!(client_id = self.client_id, error = %e, "failed to load client");
                self.error = Some(format!("Failed to load client: {}", error_message(&e)));
            }
        }
        true
    }

    pub fn load<T: Transport>(&mut self, api: &BankApi<T>) {
        let ticket = self.begin_load();
        let result = api.get_client_full(self.client_id);
        self.finish_load(ticket, result);
    }

    /// Reload whatever a mutation made stale, if this page shows it.
    pub fn invalidate<T: Transport>(&mut self, api: &BankApi<T>, invalidation: Invalidation) {
        match invalidation {
            Invalidation::ClientFull(id) if id == self.client_id => self.load(api),
            Invalidation::ClientFull(_) | Invalidation::ClientList => {}
        }
    }

    // -- modals -------------------------------------------------------------

    pub fn client_form(&self) -> &ClientForm {
        &self.client_form
    }

    pub fn client_form_mut(&mut self) -> &mut ClientForm {
        &mut self.client_form
    }

    pub fn loan_form(&self) -> &LoanForm {
        &self.loan_form
    }

    pub fn loan_form_mut(&mut self) -> &mut LoanForm {
        &mut self.loan_form
    }

    pub fn deposit_form(&self) -> &DepositForm {
        &self.deposit_form
    }

    pub fn deposit_form_mut(&mut self) -> &mut DepositForm {
        &mut self.deposit_form
    }

    pub fn open_edit_client<T: Transport>(&mut self, api: &BankApi<T>) {
        self.client_form.open_edit(api, self.client_id);
    }

    pub fn open_add_loan<T: Transport>(&mut self, api: &BankApi<T>) {
        self.loan_form.open_create(api);
    }

    pub fn open_edit_loan<T: Transport>(&mut self, api: &BankApi<T>, id: LoanId) {
        self.loan_form.open_edit(api, id);
    }

    pub fn open_add_deposit<T: Transport>(&mut self, api: &BankApi<T>) {
        self.deposit_form.open_create(api);
    }

    pub fn open_edit_deposit<T: Transport>(&mut self, api: &BankApi<T>, id: DepositId) {
        self.deposit_form.open_edit(api, id);
    }

    pub fn submit_client_form<T: Transport>(&mut self, api: &BankApi<T>) -> Result<(), FormError> {
        let invalidation = self.client_form.submit(api)?;
        self.invalidate(api, invalidation);
        Ok(())
    }

    pub fn submit_loan_form<T: Transport>(&mut self, api: &BankApi<T>) -> Result<(), FormError> {
        let invalidation = self.loan_form.submit(api)?;
        self.invalidate(api, invalidation);
        Ok(())
    }

    pub fn submit_deposit_form<T: Transport>(&mut self, api: &BankApi<T>) -> Result<(), FormError> {
        let invalidation = self.deposit_form.submit(api)?;
        self.invalidate(api, invalidation);
        Ok(())
    }

    // -- deletion -----------------------------------------------------------

    pub fn delete_confirmation(&self) -> Option<&DeleteConfirmation> {
        self.delete.as_ref()
    }

    pub fn request_delete(&mut self, target: DeleteTarget) {
        let label = self.delete_label(target);
        self.delete = Some(DeleteConfirmation {
            target,
            label,
            error: None,
        });
    }

    pub fn cancel_delete(&mut self) {
        self.delete = None;
    }

    /// Run the pending delete. On failure the dialog stays open with the
    /// message and the aggregate is left as it was.
    pub fn confirm_delete<T: Transport>(&mut self, api: &BankApi<T>) -> Result<PageOutcome, ApiError> {
        let Some(target) = self.delete.as_ref().map(|pending| pending.target) else {
            return Ok(PageOutcome::Stay);
        };

        let result = match target {
            DeleteTarget::Client => api.delete_client(self.client_id, true),
            DeleteTarget::Loan(id) => api.delete_loan(id),
            DeleteTarget::Deposit(id) => api.delete_deposit(id),
        };

        if let Err(e) = result {
            tracing::error!(client_id = self.client_id, ?target, error = %e, "delete failed");
            if let Some(pending) = self.delete.as_mut() {
                pending.error = Some(error_message(&e));
            }
            return Err(e);
        }

        tracing::info!(client_id = self.client_id, ?target, "deleted");
        self.delete = None;
        match target {
            DeleteTarget::Client => {
                // Nothing left to show; drop any load still in flight.
                self.generation.cancel();
                self.client = None;
                Ok(PageOutcome::Navigate(Route::ClientList))
            }
            DeleteTarget::Loan(_) | DeleteTarget::Deposit(_) => {
                self.load(api);
                Ok(PageOutcome::Stay)
            }
        }
    }

    fn delete_label(&self, target: DeleteTarget) -> String {
        match target {
            DeleteTarget::Client => self
                .client
                .as_ref()
                .map(|full| full.client.full_name.clone())
                .unwrap_or_else(|| format!("client #{}", self.client_id)),
            DeleteTarget::Loan(id) => format!("loan #{id}"),
            DeleteTarget::Deposit(id) => {
                let kind = self
                    .client
                    .as_ref()
                    .and_then(|full| full.deposit(id))
                    .map(|deposit| format!(" ({})", deposit.deposit_type.name))
                    .unwrap_or_default();
                format!("deposit #{id}{kind}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::forms::FormPhase;
    use crate::http::HttpMethod;
    use crate::testing::{self, ScriptedTransport};

    fn page() -> ClientDetailPage {
        ClientDetailPage::with_today(7, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn load_populates_aggregate() {
        let transport = ScriptedTransport::new();
        transport.reply(
            HttpMethod::Get,
            "/clients/7/full",
            200,
            testing::client_full(
                7,
                "Pavel Sokolov",
                vec![testing::loan(1, 7, 1000.0, None)],
                vec![testing::deposit(2, 7, 3000.0)],
            ),
        );
        let api = testing::api(&transport);
        let mut page = page();
        page.load(&api);

        let full = page.client().unwrap();
        assert_eq!(full.client.full_name, "Pavel Sokolov");
        assert_eq!(full.loans.len(), 1);
        assert_eq!(full.deposits.len(), 1);
        assert!(page.error().is_none());
    }

    #[test]
    fn missing_client_sets_error() {
        let transport = ScriptedTransport::new();
        transport.reply(HttpMethod::Get, "/clients/7/full", 404, json!({"detail": "Client not found"}));
        let api = testing::api(&transport);
        let mut page = page();
        page.load(&api);
        assert!(page.client().is_none());
        assert_eq!(page.error(), Some("Failed to load client: Client not found"));
    }

    #[test]
    fn creating_a_loan_refetches_and_closes_modal() {
        let transport = ScriptedTransport::new();
        transport
            .reply(HttpMethod::Get, "/clients/7/full", 200, testing::client_full(7, "Pavel Sokolov", vec![], vec![]))
            .reply(
                HttpMethod::Get,
                "/clients/7/full",
                200,
                testing::client_full(7, "Pavel Sokolov", vec![testing::loan(11, 7, 100_000.0, None)], vec![]),
            )
            .reply(HttpMethod::Post, "/finance/loans", 201, testing::loan(11, 7, 100_000.0, None));
        let api = testing::api(&transport);

        let mut page = page();
        page.load(&api);
        assert!(page.client().unwrap().loans.is_empty());

        page.open_add_loan(&api);
        assert_eq!(page.loan_form().phase(), FormPhase::Ready);
        page.submit_loan_form(&api).unwrap();

        assert_eq!(page.loan_form().phase(), FormPhase::Closed);
        let loans = &page.client().unwrap().loans;
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].id, 11);
        assert_eq!(transport.count(HttpMethod::Get, "/clients/7/full"), 2);
    }

    #[test]
    fn failed_deposit_save_keeps_aggregate_and_modal() {
        let transport = ScriptedTransport::new();
        testing::with_references(&transport);
        transport
            .reply(HttpMethod::Get, "/clients/7/full", 200, testing::client_full(7, "Pavel Sokolov", vec![], vec![]))
            .reply(HttpMethod::Post, "/finance/deposits", 404, json!({"detail": "Client not found"}));
        let api = testing::api(&transport);

        let mut page = page();
        page.load(&api);
        page.open_add_deposit(&api);
        page.deposit_form_mut().fields_mut().type_id = 1;
        assert!(page.submit_deposit_form(&api).is_err());

        assert!(page.deposit_form().is_open());
        assert_eq!(page.deposit_form().error(), Some("Client not found"));
        assert_eq!(transport.count(HttpMethod::Get, "/clients/7/full"), 1);
    }

    #[test]
    fn editing_client_refetches_full_view() {
        let transport = ScriptedTransport::new();
        testing::with_references(&transport);
        transport
            .reply(HttpMethod::Get, "/clients/7/full", 200, testing::client_full(7, "Pavel Sokolov", vec![], vec![]))
            .reply(HttpMethod::Get, "/clients/7/full", 200, testing::client_full(7, "Pavel Sokolov-Belov", vec![], vec![]))
            .reply(HttpMethod::Get, "/clients/7", 200, testing::client_detail(7, "Pavel Sokolov"))
            .reply(HttpMethod::Put, "/clients/7", 200, testing::client_detail(7, "Pavel Sokolov-Belov"));
        let api = testing::api(&transport);

        let mut page = page();
        page.load(&api);
        page.open_edit_client(&api);
        page.client_form_mut().fields_mut().full_name = "Pavel Sokolov-Belov".to_string();
        page.submit_client_form(&api).unwrap();

        assert_eq!(page.client().unwrap().client.full_name, "Pavel Sokolov-Belov");
    }

    #[test]
    fn deleting_client_forces_cascade_and_navigates() {
        let transport = ScriptedTransport::new();
        transport
            .reply(
                HttpMethod::Get,
                "/clients/7/full",
                200,
                testing::client_full(7, "Pavel Sokolov", vec![testing::loan(1, 7, 10.0, None)], vec![]),
            )
            .reply(HttpMethod::Delete, "/clients/7?force=true", 204, serde_json::Value::Null);
        let api = testing::api(&transport);

        let mut page = page();
        page.load(&api);
        page.request_delete(DeleteTarget::Client);
        let pending = page.delete_confirmation().unwrap();
        assert_eq!(pending.label, "Pavel Sokolov");
        assert!(pending.prompt().contains("loans and deposits"));

        let outcome = page.confirm_delete(&api).unwrap();
        assert_eq!(outcome, PageOutcome::Navigate(Route::ClientList));
        assert!(page.delete_confirmation().is_none());
        assert!(page.client().is_none());
        assert_eq!(transport.count(HttpMethod::Delete, "/clients/7?force=true"), 1);
    }

    #[test]
    fn deleting_a_deposit_refetches_and_stays() {
        let transport = ScriptedTransport::new();
        transport
            .reply(
                HttpMethod::Get,
                "/clients/7/full",
                200,
                testing::client_full(7, "Pavel Sokolov", vec![], vec![testing::deposit(2, 7, 3000.0)]),
            )
            .reply(HttpMethod::Get, "/clients/7/full", 200, testing::client_full(7, "Pavel Sokolov", vec![], vec![]))
            .reply(HttpMethod::Delete, "/finance/deposits/2", 204, serde_json::Value::Null);
        let api = testing::api(&transport);

        let mut page = page();
        page.load(&api);
        page.request_delete(DeleteTarget::Deposit(2));
        assert_eq!(page.delete_confirmation().unwrap().label, "deposit #2 (Term)");

        assert_eq!(page.confirm_delete(&api), Ok(PageOutcome::Stay));
        assert!(page.client().unwrap().deposits.is_empty());
    }

    #[test]
    fn failed_delete_keeps_dialog_and_data() {
        let transport = ScriptedTransport::new();
        transport
            .reply(
                HttpMethod::Get,
                "/clients/7/full",
                200,
                testing::client_full(7, "Pavel Sokolov", vec![testing::loan(1, 7, 10.0, None)], vec![]),
            )
            .reply(HttpMethod::Delete, "/finance/loans/1", 500, json!({"message": "storage offline"}));
        let api = testing::api(&transport);

        let mut page = page();
        page.load(&api);
        page.request_delete(DeleteTarget::Loan(1));
        assert!(page.confirm_delete(&api).is_err());

        let pending = page.delete_confirmation().unwrap();
        assert_eq!(pending.target, DeleteTarget::Loan(1));
        assert_eq!(pending.error.as_deref(), Some("storage offline"));
        assert_eq!(page.client().unwrap().loans.len(), 1);
        assert_eq!(transport.count(HttpMethod::Get, "/clients/7/full"), 1);
    }

    #[test]
    fn cancel_and_confirm_without_pending_is_noop() {
        let transport = ScriptedTransport::new();
        let api = testing::api(&transport);
        let mut page = page();
        page.request_delete(DeleteTarget::Loan(3));
        page.cancel_delete();
        assert_eq!(page.confirm_delete(&api), Ok(PageOutcome::Stay));
        assert!(transport.calls().is_empty());
    }
}
