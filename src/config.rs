//! # Settings
//!
//! Process-wide configuration, read once at startup and passed explicitly
//! to whatever needs it.
//!
//! | Variable                     | Meaning                              | Default                     |
//! |------------------------------|--------------------------------------|-----------------------------|
//! | `ESV_API_KEY`                | credential for the ESV provider      | unset                       |
//! | `UNSPLASH_ACCESS_KEY`        | credential for photo search          | unset                       |
//! | `VERSECARD_FONT`             | TTF/OTF used to measure and paint    | built-in bitmap face        |
//! | `VERSECARD_THEME`            | `light` or `dark`                    | `light`                     |
//! | `VERSECARD_BIBLE_API_URL`    | default verse provider base URL      | `https://bible-api.com`     |
//! | `VERSECARD_ESV_API_URL`      | ESV provider base URL                | `https://api.esv.org`       |
//! | `VERSECARD_UNSPLASH_API_URL` | photo search base URL                | `https://api.unsplash.com`  |
//!
//! Empty values count as unset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIBLE_API_URL: &str = "https://bible-api.com";
pub const DEFAULT_ESV_API_URL: &str = "https://api.esv.org";
pub const DEFAULT_UNSPLASH_API_URL: &str = "https://api.unsplash.com";

/// Light/dark preference for the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub esv_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub font_path: Option<PathBuf>,
    pub theme: Theme,
    pub bible_api_url: String,
    pub esv_api_url: String,
    pub unsplash_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            esv_api_key: None,
            unsplash_access_key: None,
            font_path: None,
            theme: Theme::Light,
            bible_api_url: DEFAULT_BIBLE_API_URL.to_string(),
            esv_api_url: DEFAULT_ESV_API_URL.to_string(),
            unsplash_api_url: DEFAULT_UNSPLASH_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let theme = match get("VERSECARD_THEME") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to {}", e, Theme::default());
                Theme::default()
            }),
            None => Theme::default(),
        };

        Self {
            esv_api_key: get("ESV_API_KEY"),
            unsplash_access_key: get("UNSPLASH_ACCESS_KEY"),
            font_path: get("VERSECARD_FONT").map(PathBuf::from),
            theme,
            bible_api_url: get("VERSECARD_BIBLE_API_URL").unwrap_or(defaults.bible_api_url),
            esv_api_url: get("VERSECARD_ESV_API_URL").unwrap_or(defaults.esv_api_url),
            unsplash_api_url: get("VERSECARD_UNSPLASH_API_URL").unwrap_or(defaults.unsplash_api_url),
        }
    }
}
