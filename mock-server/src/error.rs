//! Error bodies in the shape the real backend produces.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// One entry of a 422 `detail` list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn body(field: &str, msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
            kind,
        }
    }
}

#[derive(Debug)]
pub enum ServerError {
    /// `{"detail": "<Entity> not found"}` with 404.
    NotFound(&'static str),
    Validation(Vec<FieldError>),
    Conflict(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": format!("{entity} not found") })),
            )
                .into_response(),
            ServerError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))).into_response()
            }
            ServerError::Conflict(detail) => {
                (StatusCode::CONFLICT, Json(json!({ "detail": detail }))).into_response()
            }
        }
    }
}

/// Collects field errors and turns a non-empty set into a 422.
#[derive(Debug, Default)]
pub struct Checks(Vec<FieldError>);

impl Checks {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn finish(self) -> Result<(), ServerError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ServerError::Validation(self.0))
        }
    }
}
