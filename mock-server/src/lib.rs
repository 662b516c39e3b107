//! Reference backend for the bank client.
//!
//! Serves the REST surface under `/api/v1` from an in-memory [`Store`].
//! Error bodies follow the real backend: `{"detail": "..."}` for 404/409
//! and a `{"detail": [{loc, msg, type}]}` list for 422.

mod error;
mod model;
mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use error::{FieldError, ServerError};
pub use model::{
    ClientCreate, ClientDetail, ClientFull, ClientSummary, ClientUpdate, DeleteParams, Deposit,
    DepositCreate, DepositUpdate, Job, Loan, LoanCreate, LoanUpdate, Named,
};
pub use store::Store;

pub const API_PREFIX: &str = "/api/v1";

pub type Db = Arc<RwLock<Store>>;

/// Router over an empty store (lookup tables only).
pub fn app() -> Router {
    app_with(Store::new())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/clients/", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/clients/{id}/full", get(get_client_full))
        .route("/references/jobs", get(list_jobs))
        .route("/references/education-levels", get(list_education_levels))
        .route("/references/marital-statuses", get(list_marital_statuses))
        .route("/references/deposit-types", get(list_deposit_types))
        .route("/finance/loans", post(create_loan))
        .route("/finance/loans/{id}", put(update_loan).delete(delete_loan))
        .route("/finance/deposits", post(create_deposit))
        .route(
            "/finance/deposits/{id}",
            put(update_deposit).delete(delete_deposit),
        );
    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Store::new()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// -- clients ----------------------------------------------------------------

async fn list_clients(State(db): State<Db>) -> Result<Json<Vec<ClientSummary>>, ServerError> {
    db.read().await.list_clients().map(Json)
}

async fn get_client(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<ClientDetail>, ServerError> {
    db.read().await.get_client(id).map(Json)
}

async fn get_client_full(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<ClientFull>, ServerError> {
    db.read().await.get_client_full(id).map(Json)
}

async fn create_client(
    State(db): State<Db>,
    Json(input): Json<ClientCreate>,
) -> Result<(StatusCode, Json<ClientDetail>), ServerError> {
    let client = db.write().await.create_client(input)?;
    Ok((StatusCode::CREATED, Json(client)))
}

async fn update_client(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ClientUpdate>,
) -> Result<Json<ClientDetail>, ServerError> {
    db.write().await.update_client(id, input).map(Json)
}

async fn delete_client(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, ServerError> {
    db.write().await.delete_client(id, params.force)?;
    Ok(StatusCode::NO_CONTENT)
}

// -- references -------------------------------------------------------------

async fn list_jobs(State(db): State<Db>) -> Json<Vec<Job>> {
    Json(db.read().await.jobs().to_vec())
}

async fn list_education_levels(State(db): State<Db>) -> Json<Vec<Named>> {
    Json(db.read().await.education_levels().to_vec())
}

async fn list_marital_statuses(State(db): State<Db>) -> Json<Vec<Named>> {
    Json(db.read().await.marital_statuses().to_vec())
}

async fn list_deposit_types(State(db): State<Db>) -> Json<Vec<Named>> {
    Json(db.read().await.deposit_types().to_vec())
}

// -- finance ----------------------------------------------------------------

async fn create_loan(
    State(db): State<Db>,
    Json(input): Json<LoanCreate>,
) -> Result<(StatusCode, Json<Loan>), ServerError> {
    let loan = db.write().await.create_loan(input)?;
    Ok((StatusCode::CREATED, Json(loan)))
}

async fn update_loan(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<LoanUpdate>,
) -> Result<Json<Loan>, ServerError> {
    db.write().await.update_loan(id, input).map(Json)
}

async fn delete_loan(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ServerError> {
    db.write().await.delete_loan(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_deposit(
    State(db): State<Db>,
    Json(input): Json<DepositCreate>,
) -> Result<(StatusCode, Json<Deposit>), ServerError> {
    let deposit = db.write().await.create_deposit(input)?;
    Ok((StatusCode::CREATED, Json(deposit)))
}

async fn update_deposit(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<DepositUpdate>,
) -> Result<Json<Deposit>, ServerError> {
    db.write().await.update_deposit(id, input).map(Json)
}

async fn delete_deposit(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    db.write().await.delete_deposit(id)?;
    Ok(StatusCode::NO_CONTENT)
}
