//! Fetch bookkeeping shared by the pages.
//!
//! # Design
//! A page starts a load with `Generation::begin`, which hands out a
//! `Ticket`. When the result arrives the page checks `is_current`; if a
//! newer load has started since (or the page was torn down), the result is
//! dropped instead of overwriting fresher state.
//!
//! Mutations never patch page state. They report an `Invalidation` naming
//! the aggregate that must be re-read, and the owning page reloads it.

use crate::types::ClientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding any outstanding one.
    pub fn begin(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    /// Supersede every outstanding fetch without starting a new one.
    pub fn cancel(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }
}

/// The aggregate a successful mutation made stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// `GET /clients/`
    ClientList,
    /// `GET /clients/{id}/full`
    ClientFull(ClientId),
}
