//! Verse lookup proxy.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::VersecardError;
use crate::sources::Translation;

use super::super::state::AppState;
use super::error_response;

#[derive(Debug, Deserialize)]
pub struct VerseQuery {
    #[serde(default)]
    pub reference: String,
    pub translation: Option<String>,
}

/// Handle GET /api/verse - look up a passage.
pub async fn lookup(State(state): State<Arc<AppState>>, Query(query): Query<VerseQuery>) -> Response {
    let translation = match query.translation.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(code) => match code.parse::<Translation>() {
            Ok(t) => t,
            Err(e) => return error_response(&VersecardError::Validation(e)),
        },
        None => Translation::default(),
    };

    match state.verses.lookup(&query.reference, translation).await {
        Ok(verse) => Json(json!({
            "success": true,
            "reference": verse.reference,
            "text": verse.text,
            "translation": translation.code(),
        }))
        .into_response(),
        Err(e) => error_response(&e),
    }
}
