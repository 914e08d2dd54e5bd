//! Server state and configuration.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::VersecardError;
use crate::sources::{http_client, PhotoSearch, UnsplashClient, VerseLibrary};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub settings: Settings,
    pub verses: VerseLibrary,
    pub photos: Arc<dyn PhotoSearch>,
}

impl AppState {
    /// Wire the real upstream adapters from settings.
    pub fn from_settings(settings: Settings) -> Result<Self, VersecardError> {
        let client = http_client()?;
        let verses = VerseLibrary::from_settings(&settings, client.clone());
        let photos = Arc::new(UnsplashClient::new(
            client,
            settings.unsplash_api_url.clone(),
            settings.unsplash_access_key.clone(),
        ));
        Ok(Self {
            settings,
            verses,
            photos,
        })
    }
}
