//! Client core for the bank back office.
//!
//! # Overview
//! Typed access to the clients / loans / deposits REST API plus the state
//! behind the three screens that use it: dashboard, searchable client list,
//! and client detail with its create/edit modals and delete dialog.
//!
//! # Design
//! - `BankClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network; a `Transport` does the I/O and
//!   `BankApi` combines the two into typed calls.
//! - Pages hold no authoritative copy of anything. Mutations report an
//!   `Invalidation` and the page re-reads that aggregate.
//! - Each page tags its loads with a `Generation` ticket so a superseded
//!   response is dropped instead of clobbering newer state.
//! - DTOs are defined independently from the mock-server crate; the
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod http;
pub mod list_view;
pub mod message;
pub mod pages;
pub mod patch;
pub mod routes;
pub mod token;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::BankApi;
pub use client::BankClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, StatusClass};
pub use fetch::{Generation, Invalidation, Ticket};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use message::error_message;
pub use patch::Patch;
pub use routes::Route;
pub use token::{MemoryTokenStore, TokenStore};
pub use transport::{Transport, UreqTransport};
pub use types::{
    ClientCreate, ClientDetail, ClientFull, ClientSummary, ClientUpdate, Deposit, DepositCreate,
    DepositType, DepositUpdate, EducationLevel, Job, Loan, LoanCreate, LoanUpdate, MaritalStatus,
};
