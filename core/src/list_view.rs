//! In-memory search and sort over client summaries.
//!
//! The whole list is fetched once; every change of query or sort recomputes
//! the projection from the source. `project` is pure, so the same
//! (clients, query, sort) always yields the same order.

use std::cmp::Ordering;

use crate::types::ClientSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Age,
    Salary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Header click: the active key flips direction, any other key starts
    /// ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn clear(&mut self) {
        *self = SortSpec::default();
    }
}

pub fn matches_query(client: &ClientSummary, query: &str) -> bool {
    query.is_empty() || client.full_name.to_lowercase().contains(&query.to_lowercase())
}

fn compare(a: &ClientSummary, b: &ClientSummary, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()),
        SortKey::Age => a.age.cmp(&b.age),
        SortKey::Salary => a.job.salary.cmp(&b.job.salary),
    }
}

/// Filter by name, then sort. Ties keep their source order in both
/// directions.
pub fn project<'a>(
    clients: &'a [ClientSummary],
    query: &str,
    sort: SortSpec,
) -> Vec<&'a ClientSummary> {
    let mut rows: Vec<&ClientSummary> = clients
        .iter()
        .filter(|client| matches_query(client, query))
        .collect();

    if let Some(key) = sort.key {
        rows.sort_by(|a, b| {
            let ordering = compare(a, b, key);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
    rows
}
