//! # External Sources
//!
//! Thin adapters over the remote services the compositor consumes:
//!
//! - [`verse`]: verse text by `(reference, translation)`
//! - [`photo`]: candidate background photos by keyword
//! - [`loader`]: downloading and decoding the chosen photo
//!
//! Each adapter sits behind a trait so the orchestrator and the HTTP proxy
//! can be driven by in-memory fakes.

pub mod loader;
pub mod photo;
pub mod verse;

pub use loader::{HttpImageLoader, ImageLoader};
pub use photo::{PhotoSearch, UnsplashClient};
pub use verse::{Translation, Verse, VerseLibrary, VerseProvider};

use crate::error::VersecardError;

pub const USER_AGENT: &str = concat!("versecard/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for all adapters.
pub fn http_client() -> Result<reqwest::Client, VersecardError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| VersecardError::Config(format!("HTTP client error: {}", e)))
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join a base URL and a path without doubling or dropping the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  For God\n so   loved\t"), "For God so loved");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://api.esv.org/", "/v3/passage/text/"), "https://api.esv.org/v3/passage/text/");
        assert_eq!(join_url("http://127.0.0.1:80", "search/photos"), "http://127.0.0.1:80/search/photos");
    }
}
