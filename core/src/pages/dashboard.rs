//! Dashboard: headline numbers over the client list.

use crate::api::BankApi;
use crate::error::ApiError;
use crate::fetch::{Generation, Ticket};
use crate::message::error_message;
use crate::transport::Transport;
use crate::types::ClientSummary;

pub const RECENT_CLIENTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub bankrupt_clients: usize,
    /// Mean job salary, rounded; 0 without clients.
    pub average_salary: i64,
    /// Share of non-bankrupt clients in percent, rounded; 0 without clients.
    pub active_rate: u32,
    pub recent: Vec<ClientSummary>,
}

impl DashboardStats {
    pub fn from_clients(clients: &[ClientSummary]) -> Self {
        let total_clients = clients.len();
        let bankrupt_clients = clients.iter().filter(|c| c.is_bankrupt).count();

        let (average_salary, active_rate) = if total_clients == 0 {
            (0, 0)
        } else {
            let total = total_clients as f64;
            let salary_sum: i64 = clients.iter().map(|c| c.job.salary).sum();
            let active = (total_clients - bankrupt_clients) as f64;
            (
                (salary_sum as f64 / total).round() as i64,
                (active / total * 100.0).round() as u32,
            )
        };

        Self {
            total_clients,
            bankrupt_clients,
            average_salary,
            active_rate,
            recent: clients.iter().take(RECENT_CLIENTS).cloned().collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct DashboardPage {
    clients: Vec<ClientSummary>,
    loading: bool,
    error: Option<String>,
    generation: Generation,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_clients(&self.clients)
    }

    pub fn begin_load(&mut self) -> Ticket {
        self.loading = true;
        self.generation.begin()
    }

    /// Returns false when the result belonged to a superseded load.
    pub fn finish_load(&mut self, ticket: Ticket, result: Result<Vec<ClientSummary>, ApiError>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("discarding stale dashboard load");
            return false;
        }
        self.loading = false;
        match result {
            Ok(clients) => {
                self.clients = clients;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load dashboard");
                self.error = Some(format!("Failed to load data: {}", error_message(&e)));
            }
        }
        true
    }

    pub fn load<T: Transport>(&mut self, api: &BankApi<T>) {
        let ticket = self.begin_load();
        let result = api.list_clients();
        self.finish_load(ticket, result);
    }
}
