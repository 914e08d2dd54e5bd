//! HTTP handlers for the server.

pub mod photos;
pub mod settings;
pub mod verse;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::VersecardError;

/// HTTP status for an adapter error.
pub fn error_status(error: &VersecardError) -> StatusCode {
    match error {
        VersecardError::Validation(_) => StatusCode::BAD_REQUEST,
        VersecardError::NotFound(_) => StatusCode::NOT_FOUND,
        VersecardError::Upstream(_) => StatusCode::BAD_GATEWAY,
        VersecardError::Config(_)
        | VersecardError::Image(_)
        | VersecardError::Font(_)
        | VersecardError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &VersecardError) -> Response {
    (
        error_status(error),
        Json(json!({"success": false, "error": error.to_string()})),
    )
        .into_response()
}
