//! # Verse Lookup
//!
//! Translation codes map to providers:
//!
//! | Code | Provider                          | Credential    |
//! |------|-----------------------------------|---------------|
//! | web  | [`BibleApiProvider`] (default)    | none          |
//! | kjv  | [`BibleApiProvider`]              | none          |
//! | asv  | [`BibleApiProvider`]              | none          |
//! | bbe  | [`BibleApiProvider`]              | none          |
//! | esv  | [`EsvProvider`]                   | `ESV_API_KEY` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::{collapse_whitespace, join_url};
use crate::config::Settings;
use crate::error::VersecardError;

/// A looked-up passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Canonical reference as reported by the provider.
    pub reference: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Translation {
    #[default]
    Web,
    Kjv,
    Asv,
    Bbe,
    Esv,
}

impl Translation {
    pub const ALL: [Translation; 5] = [
        Translation::Web,
        Translation::Kjv,
        Translation::Asv,
        Translation::Bbe,
        Translation::Esv,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Translation::Web => "web",
            Translation::Kjv => "kjv",
            Translation::Asv => "asv",
            Translation::Bbe => "bbe",
            Translation::Esv => "esv",
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Translation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Translation::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown translation '{}'", s))
    }
}

#[async_trait]
pub trait VerseProvider: Send + Sync {
    async fn lookup(&self, reference: &str, translation: Translation) -> Result<Verse, VersecardError>;
}

// ============================================================================
// DEFAULT PROVIDER
// ============================================================================

/// Public-domain translations served as JSON by a bible-api compatible host.
pub struct BibleApiProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct BibleApiResponse {
    reference: Option<String>,
    text: Option<String>,
    #[serde(default)]
    verses: Vec<BibleApiVerse>,
}

#[derive(Debug, Deserialize)]
struct BibleApiVerse {
    text: String,
}

impl BibleApiProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl VerseProvider for BibleApiProvider {
    async fn lookup(&self, reference: &str, translation: Translation) -> Result<Verse, VersecardError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| VersecardError::Config(format!("Invalid verse API URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| VersecardError::Config(format!("Invalid verse API URL {}", self.base_url)))?
            .pop_if_empty()
            .push(reference);

        tracing::debug!(%url, translation = %translation, "verse lookup");
        let response = self
            .client
            .get(url)
            .query(&[("translation", translation.code())])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(VersecardError::NotFound(format!("No passage found for '{}'", reference)));
        }
        if !response.status().is_success() {
            return Err(VersecardError::Upstream(format!(
                "Verse lookup failed: HTTP {}",
                response.status()
            )));
        }

        let body: BibleApiResponse = response
            .json()
            .await
            .map_err(|e| VersecardError::Upstream(format!("Malformed verse response: {}", e)))?;
        parse_bible_api(body, reference)
    }
}

fn parse_bible_api(body: BibleApiResponse, requested: &str) -> Result<Verse, VersecardError> {
    let text = if body.verses.is_empty() {
        body.text.unwrap_or_default()
    } else {
        body.verses
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let text = collapse_whitespace(&text);
    if text.is_empty() {
        return Err(VersecardError::NotFound(format!("Response for '{}' had no text", requested)));
    }

    Ok(Verse {
        reference: body
            .reference
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| requested.to_string()),
        text,
    })
}

// ============================================================================
// CREDENTIALED PROVIDER
// ============================================================================

/// ESV passages. Needs an API token held on this host.
pub struct EsvProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EsvResponse {
    #[serde(default)]
    canonical: String,
    #[serde(default)]
    passages: Vec<String>,
}

impl EsvProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl VerseProvider for EsvProvider {
    async fn lookup(&self, reference: &str, _translation: Translation) -> Result<Verse, VersecardError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            VersecardError::Config("ESV_API_KEY is not set; configure it on the server to use the ESV".into())
        })?;

        let url = join_url(&self.base_url, "v3/passage/text/");
        tracing::debug!(%url, reference, "esv lookup");
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", api_key))
            .query(&[
                ("q", reference),
                ("include-passage-references", "false"),
                ("include-verse-numbers", "false"),
                ("include-footnotes", "false"),
                ("include-headings", "false"),
                ("include-short-copyright", "false"),
            ])
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => {}
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                return Err(VersecardError::Config("ESV_API_KEY was rejected by the ESV API".into()));
            }
            s => return Err(VersecardError::Upstream(format!("ESV lookup failed: HTTP {}", s))),
        }

        let body: EsvResponse = response
            .json()
            .await
            .map_err(|e| VersecardError::Upstream(format!("Malformed ESV response: {}", e)))?;

        let passage = body
            .passages
            .first()
            .map(|p| clean_passage(p, &body.canonical))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| VersecardError::NotFound(format!("No passage found for '{}'", reference)))?;

        Ok(Verse {
            reference: if body.canonical.is_empty() {
                reference.to_string()
            } else {
                body.canonical
            },
            text: passage,
        })
    }
}

/// Strip the self-referential header, footnote markers and the trailing
/// translation tag from a passage block, then collapse whitespace.
pub fn clean_passage(raw: &str, canonical: &str) -> String {
    let mut text = raw.trim();

    let canonical = canonical.trim();
    let header = text
        .strip_prefix(canonical)
        .filter(|rest| !canonical.is_empty() && (rest.is_empty() || rest.starts_with(char::is_whitespace)));
    match header {
        Some(rest) => text = rest,
        None => text = strip_reference_header(text),
    }

    let text = text.trim_end();
    let text = text.strip_suffix("(ESV)").unwrap_or(text);

    collapse_whitespace(&strip_footnote_markers(text))
}

/// Drop a leading `"Book Chapter:Verse"` header such as `John 3:16` or
/// `1 Corinthians 13:4-7`. Text without one is returned unchanged.
fn strip_reference_header(text: &str) -> &str {
    let mut consumed = 0;
    for (i, token) in text.split_whitespace().take(4).enumerate() {
        let start = text[consumed..].find(token).map(|p| consumed + p).unwrap_or(consumed);
        consumed = start + token.len();

        let is_chapter_verse = token.contains(':')
            && token
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ':' | '-' | '–' | ','));
        if is_chapter_verse {
            return if i == 0 { text } else { text[consumed..].trim_start() };
        }

        let is_book_part = token.chars().all(|c| c.is_alphabetic()) || token.chars().all(|c| c.is_ascii_digit());
        if !is_book_part {
            break;
        }
    }
    text
}

/// Remove `[12]`, `[a]` and `(1)` style markers. Other bracketed text stays.
fn strip_footnote_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(['[', '(']) {
        let open = rest[pos..].chars().next().unwrap_or('[');
        let close = if open == '[' { ']' } else { ')' };
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match after.find(close) {
            Some(end) if is_marker(&after[..end], open) => {
                rest = &after[end + 1..];
            }
            _ => {
                out.push(open);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_marker(inner: &str, open: char) -> bool {
    if inner.is_empty() || inner.len() > 4 {
        return false;
    }
    let numeric = inner.chars().all(|c| c.is_ascii_digit());
    match open {
        '[' => numeric || (inner.len() == 1 && inner.chars().all(|c| c.is_ascii_lowercase())),
        _ => numeric,
    }
}

// ============================================================================
// ROUTING
// ============================================================================

/// Translation code → provider mapping with a default fallback.
pub struct VerseLibrary {
    default: Arc<dyn VerseProvider>,
    routes: HashMap<Translation, Arc<dyn VerseProvider>>,
}

impl VerseLibrary {
    pub fn new(default: Arc<dyn VerseProvider>) -> Self {
        Self {
            default,
            routes: HashMap::new(),
        }
    }

    /// Send one translation to a specific provider.
    pub fn route(mut self, translation: Translation, provider: Arc<dyn VerseProvider>) -> Self {
        self.routes.insert(translation, provider);
        self
    }

    /// The standard mapping: ESV to the credentialed provider, all else default.
    pub fn from_settings(settings: &Settings, client: reqwest::Client) -> Self {
        let default = Arc::new(BibleApiProvider::new(client.clone(), settings.bible_api_url.clone()));
        let esv = Arc::new(EsvProvider::new(
            client,
            settings.esv_api_url.clone(),
            settings.esv_api_key.clone(),
        ));
        Self::new(default).route(Translation::Esv, esv)
    }

    /// Look up a passage. An empty reference is rejected without a request.
    pub async fn lookup(&self, reference: &str, translation: Translation) -> Result<Verse, VersecardError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(VersecardError::Validation("Enter a reference such as John 3:16".into()));
        }

        let provider = self.routes.get(&translation).unwrap_or(&self.default);
        let result = provider.lookup(reference, translation).await;
        match &result {
            Ok(verse) => tracing::info!(reference = %verse.reference, %translation, "verse found"),
            Err(e) => tracing::warn!(reference, %translation, error = %e, "verse lookup failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_translation_codes() {
        assert_eq!("ESV".parse::<Translation>(), Ok(Translation::Esv));
        assert_eq!(Translation::Kjv.to_string(), "kjv");
        assert!("nope".parse::<Translation>().is_err());
    }

    #[test]
    fn test_clean_passage_with_canonical() {
        let raw = "John 3:16\n\n  [16] “For God so loved the world, that he gave his only Son.” (ESV)";
        assert_eq!(
            clean_passage(raw, "John 3:16"),
            "“For God so loved the world, that he gave his only Son.”"
        );
    }

    #[test]
    fn test_clean_passage_canonical_must_end_at_word_boundary() {
        let raw = "John 3:16 For God so loved the world";
        assert_eq!(clean_passage(raw, "John 3:1"), "For God so loved the world");
        assert_eq!(clean_passage("John 3:1", "John 3:1"), "");
    }

    #[test]
    fn test_clean_passage_header_heuristic() {
        let raw = "1 Corinthians 13:4 Love is patient(1) and kind;[a] love does not envy";
        assert_eq!(
            clean_passage(raw, ""),
            "Love is patient and kind; love does not envy"
        );
    }

    #[test]
    fn test_clean_passage_keeps_real_parentheses() {
        assert_eq!(
            clean_passage("Psalm 23:1 The LORD (my shepherd) is [here]", "Psalm 23:1"),
            "The LORD (my shepherd) is [here]"
        );
    }

    #[test]
    fn test_header_without_reference_untouched() {
        assert_eq!(strip_reference_header("In the beginning"), "In the beginning");
        assert_eq!(strip_reference_header("3:16 starts with digits"), "3:16 starts with digits");
    }

    #[test]
    fn test_parse_bible_api_prefers_verses() {
        let body: BibleApiResponse = serde_json::from_str(
            r#"{"reference":"Psalm 46:10","verses":[{"text":"Be still,\n"},{"text":"and know.\n"}],"text":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(
            parse_bible_api(body, "psalm 46:10").unwrap(),
            Verse {
                reference: "Psalm 46:10".into(),
                text: "Be still, and know.".into()
            }
        );
    }

    #[test]
    fn test_parse_bible_api_text_only() {
        let body: BibleApiResponse = serde_json::from_str(r#"{"text":" Jesus wept.\n"}"#).unwrap();
        let verse = parse_bible_api(body, "John 11:35").unwrap();
        assert_eq!(verse.reference, "John 11:35");
        assert_eq!(verse.text, "Jesus wept.");
    }

    #[test]
    fn test_parse_bible_api_missing_text() {
        let body: BibleApiResponse = serde_json::from_str(r#"{"reference":"X 1:1"}"#).unwrap();
        assert!(matches!(parse_bible_api(body, "X 1:1"), Err(VersecardError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_esv_without_key_is_config_error() {
        let provider = EsvProvider::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        let err = provider.lookup("John 3:16", Translation::Esv).await.unwrap_err();
        assert!(err.is_config());
    }

    struct Fixed(&'static str);

    #[async_trait]
    impl VerseProvider for Fixed {
        async fn lookup(&self, reference: &str, _t: Translation) -> Result<Verse, VersecardError> {
            Ok(Verse {
                reference: reference.to_string(),
                text: self.0.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_library_routes_by_translation() {
        let library = VerseLibrary::new(Arc::new(Fixed("default"))).route(Translation::Esv, Arc::new(Fixed("esv")));
        assert_eq!(library.lookup("John 1:1", Translation::Kjv).await.unwrap().text, "default");
        assert_eq!(library.lookup("John 1:1", Translation::Esv).await.unwrap().text, "esv");
    }

    #[tokio::test]
    async fn test_library_rejects_empty_reference() {
        let library = VerseLibrary::new(Arc::new(Fixed("x")));
        assert!(matches!(
            library.lookup("   ", Translation::Web).await,
            Err(VersecardError::Validation(_))
        ));
    }
}
