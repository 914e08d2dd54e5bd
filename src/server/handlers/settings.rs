//! Client-facing settings.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Theme;
use crate::model::{SizePreset, Style};
use crate::sources::Translation;

use super::super::state::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsInfo {
    pub theme: Theme,
    pub styles: Vec<&'static str>,
    pub sizes: Vec<SizeInfo>,
    pub translations: Vec<&'static str>,
    pub esv_configured: bool,
    pub photos_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct SizeInfo {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Handle GET /api/settings - theme and which features this host supports.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<SettingsInfo> {
    let settings = &state.settings;
    Json(SettingsInfo {
        theme: settings.theme,
        styles: Style::ALL.iter().map(|s| s.name()).collect(),
        sizes: SizePreset::ALL
            .iter()
            .map(|s| {
                let (width, height) = s.dimensions();
                SizeInfo {
                    name: s.name(),
                    width,
                    height,
                }
            })
            .collect(),
        translations: Translation::ALL.iter().map(|t| t.code()).collect(),
        esv_configured: settings.esv_api_key.is_some(),
        photos_configured: settings.unsplash_access_key.is_some(),
    })
}
