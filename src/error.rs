//! # Error Types
//!
//! This module defines error types used throughout the versecard library.

use thiserror::Error;

/// Main error type for versecard operations
#[derive(Debug, Error)]
pub enum VersecardError {
    /// Caller input rejected before any network call (e.g. empty search query)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Upstream answered but had nothing for the request
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream failed or returned a malformed response
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A required credential or setting is missing on this host
    #[error("Configuration error: {0}")]
    Config(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Font loading error
    #[error("Font error: {0}")]
    Font(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VersecardError {
    /// True for errors the operator has to fix rather than the user.
    pub fn is_config(&self) -> bool {
        matches!(self, VersecardError::Config(_))
    }
}

impl From<reqwest::Error> for VersecardError {
    fn from(e: reqwest::Error) -> Self {
        VersecardError::Upstream(e.to_string())
    }
}

impl From<image::ImageError> for VersecardError {
    fn from(e: image::ImageError) -> Self {
        VersecardError::Image(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_distinct() {
        assert!(VersecardError::Config("ESV_API_KEY is not set".into()).is_config());
        assert!(!VersecardError::NotFound("John 99:1".into()).is_config());
    }

    #[test]
    fn test_display_messages() {
        let e = VersecardError::Validation("search query is empty".into());
        assert_eq!(e.to_string(), "Invalid input: search query is empty");
    }
}
