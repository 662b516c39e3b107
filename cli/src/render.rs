//! Plain-text rendering of the three pages.

use std::fmt::Write;

use bank_core::pages::{ClientListPage, DashboardStats, ListContent};
use bank_core::{ClientFull, ClientSummary};

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn summary_row(out: &mut String, client: &ClientSummary) {
    let _ = writeln!(
        out,
        "{:>5}  {:<28} {:>4}  {:<14} {:>10}  {}",
        client.id,
        client.full_name,
        client.age,
        client.job.name,
        client.job.salary,
        if client.is_bankrupt { "bankrupt" } else { "" },
    );
}

fn summary_header(out: &mut String) {
    let _ = writeln!(
        out,
        "{:>5}  {:<28} {:>4}  {:<14} {:>10}",
        "ID", "Name", "Age", "Job", "Salary"
    );
}

pub fn dashboard(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total clients:   {}", stats.total_clients);
    let _ = writeln!(out, "Bankrupt:        {}", stats.bankrupt_clients);
    let _ = writeln!(out, "Average salary:  {}", stats.average_salary);
    let _ = writeln!(out, "Active rate:     {}%", stats.active_rate);
    if !stats.recent.is_empty() {
        let _ = writeln!(out, "\nRecent clients");
        summary_header(&mut out);
        for client in &stats.recent {
            summary_row(&mut out, client);
        }
    }
    out
}

pub fn client_list(page: &ClientListPage) -> String {
    let mut out = String::new();
    match page.content() {
        ListContent::NoClients => {
            let _ = writeln!(out, "No clients yet");
        }
        ListContent::NoMatches(query) => {
            let _ = writeln!(out, "No clients match \"{query}\"");
        }
        ListContent::Rows => {
            summary_header(&mut out);
            for client in page.visible() {
                summary_row(&mut out, client);
            }
        }
    }
    let _ = writeln!(out, "{}", page.showing_label());
    out
}

pub fn client_full(full: &ClientFull) -> String {
    let client = &full.client;
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", client.full_name, client.id);
    let _ = writeln!(out, "Age:             {}", client.age);
    let _ = writeln!(out, "Job:             {} ({})", client.job.name, client.job.salary);
    let _ = writeln!(out, "Education:       {}", client.education_level.name);
    let _ = writeln!(out, "Marital status:  {}", client.marital_status.name);
    let _ = writeln!(out, "Bankrupt:        {}", yes_no(client.is_bankrupt));

    let _ = writeln!(out, "\nLoans ({})", full.loans.len());
    for loan in &full.loans {
        let _ = write!(
            out,
            "  #{:<4} {:>12.2} at {:>5.2}%  {} .. {}",
            loan.id, loan.amount, loan.interest_rate, loan.start_date, loan.end_date
        );
        if loan.is_overdue {
            let _ = write!(out, "  OVERDUE {:.2}", loan.overdue_amount);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nDeposits ({})", full.deposits.len());
    for deposit in &full.deposits {
        let _ = writeln!(
            out,
            "  #{:<4} {:<12} {:>12.2} at {:>5.2}% -> {:.2}  {} .. {}",
            deposit.id,
            deposit.deposit_type.name,
            deposit.amount,
            deposit.interest_rate,
            deposit.final_amount,
            deposit.start_date,
            deposit.end_date
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summaries() -> Vec<ClientSummary> {
        serde_json::from_value(json!([
            {"id": 1, "full_name": "Boris Orlov", "age": 45, "is_bankrupt": false,
             "job": {"id": 2, "name": "Manager", "salary": 80000}},
            {"id": 2, "full_name": "Anna Petrova", "age": 29, "is_bankrupt": true,
             "job": {"id": 1, "name": "Programmer", "salary": 150000}}
        ]))
        .unwrap()
    }

    fn loaded_page() -> ClientListPage {
        let mut page = ClientListPage::new();
        let ticket = page.begin_load();
        page.finish_load(ticket, Ok(summaries()));
        page
    }

    #[test]
    fn dashboard_lists_totals_and_recent() {
        let text = dashboard(&DashboardStats::from_clients(&summaries()));
        assert!(text.contains("Total clients:   2"));
        assert!(text.contains("Average salary:  115000"));
        assert!(text.contains("Active rate:     50%"));
        assert!(text.contains("Anna Petrova"));
    }

    #[test]
    fn list_shows_rows_and_label() {
        let text = client_list(&loaded_page());
        assert!(text.contains("Boris Orlov"));
        assert!(text.contains("bankrupt"));
        assert!(text.ends_with("Showing 2 of 2 clients\n"));
    }

    #[test]
    fn list_reports_empty_search() {
        let mut page = loaded_page();
        page.set_query("zzz");
        let text = client_list(&page);
        assert!(text.starts_with("No clients match \"zzz\""));
        assert!(text.contains("Showing 0 of 2 clients"));
    }

    #[test]
    fn full_view_marks_overdue_loans() {
        let full: ClientFull = serde_json::from_value(json!({
            "id": 3, "full_name": "Viktor Annenkov", "age": 61, "is_bankrupt": true,
            "job": {"id": 6, "name": "Teacher", "salary": 50000},
            "education_level": {"id": 1, "name": "Secondary"},
            "marital_status": {"id": 4, "name": "Widowed"},
            "loans": [{"id": 8, "client_id": 3, "amount": 480000.0, "interest_rate": 21.0,
                       "is_overdue": true, "overdue_amount": 62400.0,
                       "start_date": "2023-09-15", "end_date": "2025-09-15"}],
            "deposits": []
        }))
        .unwrap();
        let text = client_full(&full);
        assert!(text.starts_with("Viktor Annenkov (#3)"));
        assert!(text.contains("Bankrupt:        yes"));
        assert!(text.contains("OVERDUE 62400.00"));
        assert!(text.contains("Deposits (0)"));
    }
}
