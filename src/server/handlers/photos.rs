//! Photo search proxy. Keeps the access key on the server.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::sources::photo::{DEFAULT_PAGE, DEFAULT_PER_PAGE};

use super::super::state::AppState;
use super::error_response;

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Handle GET /api/photos - search background photos.
pub async fn search(State(state): State<Arc<AppState>>, Query(query): Query<PhotoQuery>) -> Response {
    match state.photos.search(&query.query, query.page, query.per_page).await {
        Ok(results) => Json(json!({"success": true, "results": results})).into_response(),
        Err(e) => {
            if e.is_config() {
                tracing::error!(error = %e, "photo search is not configured");
            }
            error_response(&e)
        }
    }
}
