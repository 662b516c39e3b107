//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port, then drives the core
//! over real HTTP through `UreqTransport`. This is what catches drift between
//! the client DTOs and the server's wire shapes.

use std::time::Duration;

use bank_core::forms::{ClientFields, FormPhase};
use bank_core::pages::{ClientDetailPage, ClientListPage, DeleteTarget, PageOutcome};
use bank_core::{
    error_message, ApiError, BankApi, BankClient, ClientCreate, ClientUpdate, DepositCreate,
    LoanCreate, LoanUpdate, Patch, Route, UreqTransport,
};
use chrono::NaiveDate;

/// Start a mock server with an empty store and return an API pointed at it.
fn start_server() -> BankApi<UreqTransport> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    BankApi::new(
        BankClient::new(&format!("http://{addr}{}", mock_server::API_PREFIX)),
        UreqTransport::new(Duration::from_secs(5)),
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn anna() -> ClientCreate {
    ClientCreate {
        full_name: "Anna Petrova".to_string(),
        age: 29,
        is_bankrupt: false,
        job_id: 5,
        education_level_id: 4,
        marital_status_id: 2,
    }
}

#[test]
fn crud_lifecycle() {
    let api = start_server();

    // Step 1: lookups are served.
    let jobs = api.list_jobs().unwrap();
    assert_eq!(jobs.len(), 8);
    assert_eq!(api.list_deposit_types().unwrap()[1].name, "Term");
    assert_eq!(api.list_education_levels().unwrap().len(), 5);
    assert_eq!(api.list_marital_statuses().unwrap().len(), 4);

    // Step 2: list starts empty.
    assert!(api.list_clients().unwrap().is_empty());

    // Step 3: create a client.
    let created = api.create_client(&anna()).unwrap();
    assert_eq!(created.full_name, "Anna Petrova");
    assert_eq!(created.job.name, "Engineer");
    let id = created.id;

    // Step 4: detail view expands references.
    let detail = api.get_client(id).unwrap();
    assert_eq!(detail.education_level.name, "Bachelor");
    assert_eq!(detail.marital_status.name, "Married");

    // Step 5: sparse update touches only the sent field.
    let update = ClientUpdate {
        age: Patch::Set(30),
        ..ClientUpdate::default()
    };
    let updated = api.update_client(id, &update).unwrap();
    assert_eq!(updated.age, 30);
    assert_eq!(updated.full_name, "Anna Petrova");

    // Step 6: a loan and a deposit.
    let loan = api
        .create_loan(&LoanCreate {
            client_id: id,
            amount: 100_000.0,
            interest_rate: 12.5,
            start_date: date(2024, 6, 1),
            end_date: date(2025, 6, 1),
            is_overdue: false,
            overdue_amount: 0.0,
        })
        .unwrap();
    let deposit = api
        .create_deposit(&DepositCreate {
            client_id: id,
            type_id: 2,
            amount: 50_000.0,
            interest_rate: 8.0,
            final_amount: 54_000.0,
            start_date: date(2024, 6, 1),
            end_date: date(2025, 6, 1),
        })
        .unwrap();
    assert_eq!(deposit.deposit_type.name, "Term");

    let overdue = LoanUpdate {
        is_overdue: Patch::Set(true),
        overdue_amount: Patch::Set(2_500.0),
        ..LoanUpdate::default()
    };
    let loan = api.update_loan(loan.id, &overdue).unwrap();
    assert!(loan.is_overdue);
    assert_eq!(loan.amount, 100_000.0);

    // Step 7: full view carries both.
    let full = api.get_client_full(id).unwrap();
    assert_eq!(full.loans, vec![loan.clone()]);
    assert_eq!(full.deposits.len(), 1);

    // Step 8: delete without force is refused while the client owns records.
    let err = api.delete_client(id, false).unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(error_message(&err), "Client has loans or deposits; use force=true");

    // Step 9: delete the deposit, then force-delete the client.
    api.delete_deposit(deposit.id).unwrap();
    api.delete_client(id, true).unwrap();

    // Step 10: everything is gone.
    let err = api.get_client(id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(error_message(&err), "Client not found");
    let err = api.delete_loan(loan.id).unwrap_err();
    assert_eq!(error_message(&err), "Loan not found");
    assert!(api.list_clients().unwrap().is_empty());
}

#[test]
fn validation_errors_become_messages() {
    let api = start_server();
    let bad = ClientCreate {
        full_name: "Al".to_string(),
        age: 200,
        ..anna()
    };
    let err = api.create_client(&bad).unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(error_message(&err), "Input should be less than or equal to 150");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let api = BankApi::new(
        BankClient::new(&format!("http://127.0.0.1:{port}/api/v1")),
        UreqTransport::new(Duration::from_secs(2)),
    );
    let err = api.list_clients().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout));
    assert!(!error_message(&err).is_empty());
}

#[test]
fn pages_drive_the_live_backend() {
    let api = start_server();

    // Add a client from the list page.
    let mut list = ClientListPage::new();
    list.load(&api);
    assert!(list.clients().is_empty());

    list.open_add_client(&api);
    assert_eq!(list.client_form().phase(), FormPhase::Ready);
    assert_eq!(list.client_form().references().jobs.len(), 8);
    *list.client_form_mut().fields_mut() = ClientFields {
        full_name: "Boris Orlov".to_string(),
        age: 45,
        is_bankrupt: false,
        job_id: 2,
        education_level_id: 1,
        marital_status_id: 1,
    };
    list.submit_client_form(&api).unwrap();
    assert_eq!(list.clients().len(), 1);
    let id = list.clients()[0].id;
    assert_eq!(list.route_for(id), Route::ClientDetail(id));

    // Detail page: add a loan, see it after the refetch.
    let mut detail = ClientDetailPage::with_today(id, date(2024, 6, 1));
    detail.load(&api);
    assert!(detail.client().unwrap().loans.is_empty());

    detail.open_add_loan(&api);
    detail.loan_form_mut().fields_mut().set_overdue(true);
    detail.loan_form_mut().fields_mut().set_overdue_amount(750.0);
    detail.submit_loan_form(&api).unwrap();
    assert!(!detail.loan_form().is_open());
    let loans = &detail.client().unwrap().loans;
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].overdue_amount, 750.0);
    assert_eq!(loans[0].end_date, date(2025, 6, 1));

    // Edit the loan through the modal.
    let loan_id = loans[0].id;
    detail.open_edit_loan(&api, loan_id);
    assert_eq!(detail.loan_form().phase(), FormPhase::Ready);
    detail.loan_form_mut().fields_mut().set_overdue(false);
    detail.submit_loan_form(&api).unwrap();
    let loan = &detail.client().unwrap().loans[0];
    assert!(!loan.is_overdue);
    assert_eq!(loan.overdue_amount, 0.0);

    // Delete the client with cascade and go back to the list.
    detail.request_delete(DeleteTarget::Client);
    assert_eq!(
        detail.confirm_delete(&api),
        Ok(PageOutcome::Navigate(Route::ClientList))
    );
    list.load(&api);
    assert!(list.clients().is_empty());
}
