//! Page-level state: what each screen owns and how it reloads.

mod clients;
mod dashboard;
mod detail;

use crate::routes::Route;

pub use clients::{ClientListPage, ListContent};
pub use dashboard::{DashboardPage, DashboardStats, RECENT_CLIENTS};
pub use detail::{ClientDetailPage, DeleteConfirmation, DeleteTarget};

/// Where the user ends up after a page action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Stay,
    Navigate(Route),
}
