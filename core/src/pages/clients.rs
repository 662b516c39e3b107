//! Client list page: fetch once, search and sort locally.

use crate::api::BankApi;
use crate::error::ApiError;
use crate::fetch::{Generation, Invalidation, Ticket};
use crate::forms::{ClientForm, ClientFormSpec, FormError};
use crate::list_view::{project, SortKey, SortSpec};
use crate::message::error_message;
use crate::routes::Route;
use crate::transport::Transport;
use crate::types::{ClientId, ClientSummary};

/// What the table area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListContent {
    /// The backend has no clients at all.
    NoClients,
    /// Clients exist but none match the query.
    NoMatches(String),
    Rows,
}

#[derive(Debug)]
pub struct ClientListPage {
    clients: Vec<ClientSummary>,
    loading: bool,
    error: Option<String>,
    query: String,
    sort: SortSpec,
    generation: Generation,
    form: ClientForm,
}

impl Default for ClientListPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientListPage {
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
            loading: false,
            error: None,
            query: String::new(),
            sort: SortSpec::default(),
            generation: Generation::new(),
            form: ClientForm::new(ClientFormSpec),
        }
    }

    pub fn clients(&self) -> &[ClientSummary] {
        &self.clients
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Column header click.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
    }

    pub fn visible(&self) -> Vec<&ClientSummary> {
        project(&self.clients, &self.query, self.sort)
    }

    pub fn content(&self) -> ListContent {
        if self.clients.is_empty() {
            ListContent::NoClients
        } else if self.visible().is_empty() {
            ListContent::NoMatches(self.query.clone())
        } else {
            ListContent::Rows
        }
    }

    pub fn showing_label(&self) -> String {
        format!(
            "Showing {} of {} clients",
            self.visible().len(),
            self.clients.len()
        )
    }

    pub fn route_for(&self, id: ClientId) -> Route {
        Route::ClientDetail(id)
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.generation.begin()
    }

    /// Apply a finished load. Returns false when a newer load has started
    /// since `ticket` was issued; the result is dropped in that case.
    pub fn finish_load(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<ClientSummary>, ApiError>,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("discarding stale client list");
            return false;
        }
        self.loading = false;
        match result {
            Ok(clients) => {
                tracing::debug!(count = clients.len(), "client list loaded");
                self.clients = clients;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load clients");
                self.error = Some(format!("Failed to load clients: {}", error_message(&e)));
            }
        }
        true
    }

    pub fn load<T: Transport>(&mut self, api: &BankApi<T>) {
        let ticket = self.begin_load();
        let result = api.list_clients();
        self.finish_load(ticket, result);
    }

    pub fn client_form(&self) -> &ClientForm {
        &self.form
    }

    pub fn client_form_mut(&mut self) -> &mut ClientForm {
        &mut self.form
    }

    pub fn open_add_client<T: Transport>(&mut self, api: &BankApi<T>) {
        self.form.open_create(api);
    }

    pub fn submit_client_form<T: Transport>(&mut self, api: &BankApi<T>) -> Result<(), FormError> {
        let invalidation = self.form.submit(api)?;
        self.invalidate(api, invalidation);
        Ok(())
    }

    pub fn invalidate<T: Transport>(&mut self, api: &BankApi<T>, invalidation: Invalidation) {
        match invalidation {
            Invalidation::ClientList => self.load(api),
            Invalidation::ClientFull(_) => {}
        }
    }
}
