//! # Credential Proxy
//!
//! A small HTTP server that forwards verse lookups and photo searches to
//! their upstream services, so API keys stay on the host. It never renders.
//!
//! ## Usage
//!
//! ```bash
//! ESV_API_KEY=... UNSPLASH_ACCESS_KEY=... versecard serve --listen 0.0.0.0:8080
//! ```
//!
//! | Route                                           | Result                        |
//! |-------------------------------------------------|-------------------------------|
//! | `GET /api/verse?reference=&translation=`        | `{reference, text}`           |
//! | `GET /api/photos?query=&page=&per_page=`        | `{results: [PhotoRecord]}`    |
//! | `GET /api/settings`                             | theme and configured features |

pub mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::error::VersecardError;

/// Build the router over shared state.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/verse", get(handlers::verse::lookup))
        .route("/api/photos", get(handlers::photos::search))
        .route("/api/settings", get(handlers::settings::get))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use versecard::config::Settings;
/// use versecard::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), versecard::error::VersecardError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
/// };
///
/// serve(config, Settings::from_env()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, settings: Settings) -> Result<(), VersecardError> {
    if settings.esv_api_key.is_none() {
        tracing::warn!("ESV_API_KEY is not set; ESV lookups will fail");
    }
    if settings.unsplash_access_key.is_none() {
        tracing::warn!("UNSPLASH_ACCESS_KEY is not set; photo search will fail");
    }

    let state = Arc::new(AppState::from_settings(settings)?);
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| VersecardError::Config(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    tracing::info!(listen_addr = %config.listen_addr, "versecard proxy listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| VersecardError::Upstream(format!("Server error: {}", e)))?;

    Ok(())
}
