//! # Photo Search
//!
//! Keyword search against an Unsplash-compatible API. Results are reduced
//! to [`PhotoRecord`]s; everything else in the upstream payload is ignored.

use async_trait::async_trait;
use serde::Deserialize;

use super::join_url;
use crate::error::VersecardError;
use crate::model::PhotoRecord;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 12;
pub const MAX_PER_PAGE: u32 = 30;

#[async_trait]
pub trait PhotoSearch: Send + Sync {
    /// Search photos. An empty result set is `Ok(vec![])`, not an error.
    async fn search(&self, keyword: &str, page: u32, per_page: u32) -> Result<Vec<PhotoRecord>, VersecardError>;
}

pub struct UnsplashClient {
    client: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    description: Option<String>,
    alt_description: Option<String>,
    user: UnsplashUser,
    links: UnsplashLinks,
    urls: UnsplashUrls,
}

#[derive(Debug, Deserialize)]
struct UnsplashUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashLinks {
    html: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    small: String,
    full: String,
}

impl From<UnsplashPhoto> for PhotoRecord {
    fn from(p: UnsplashPhoto) -> Self {
        PhotoRecord {
            id: p.id,
            description: p
                .description
                .or(p.alt_description)
                .unwrap_or_default(),
            photographer: p.user.name,
            link: p.links.html,
            thumb: p.urls.small,
            full: p.urls.full,
        }
    }
}

impl UnsplashClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, access_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            access_key,
        }
    }
}

#[async_trait]
impl PhotoSearch for UnsplashClient {
    async fn search(&self, keyword: &str, page: u32, per_page: u32) -> Result<Vec<PhotoRecord>, VersecardError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(VersecardError::Validation("Enter a keyword to search photos".into()));
        }
        let access_key = self.access_key.as_deref().ok_or_else(|| {
            VersecardError::Config("UNSPLASH_ACCESS_KEY is not set; configure it on the server to search photos".into())
        })?;

        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let url = join_url(&self.base_url, "search/photos");
        tracing::debug!(%url, keyword, page, per_page, "photo search");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Client-ID {}", access_key))
            .query(&[
                ("query", keyword.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => {}
            reqwest::StatusCode::UNAUTHORIZED => {
                return Err(VersecardError::Config("UNSPLASH_ACCESS_KEY was rejected".into()));
            }
            s => return Err(VersecardError::Upstream(format!("Photo search failed: HTTP {}", s))),
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| VersecardError::Upstream(format!("Malformed photo search response: {}", e)))?;

        let records: Vec<PhotoRecord> = body.results.into_iter().map(PhotoRecord::from).collect();
        tracing::info!(keyword, count = records.len(), "photo search complete");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_from_upstream() {
        let body: SearchResponse = serde_json::from_str(
            r#"{
                "total": 1,
                "results": [{
                    "id": "abc",
                    "description": null,
                    "alt_description": "mountain at dawn",
                    "user": {"name": "Ana"},
                    "links": {"html": "https://unsplash.com/photos/abc"},
                    "urls": {"small": "https://img/abc-small.jpg", "full": "https://img/abc.jpg?ixid=1", "raw": "x"}
                }]
            }"#,
        )
        .unwrap();

        let records: Vec<PhotoRecord> = body.results.into_iter().map(PhotoRecord::from).collect();
        assert_eq!(
            records,
            vec![PhotoRecord {
                id: "abc".into(),
                description: "mountain at dawn".into(),
                photographer: "Ana".into(),
                link: "https://unsplash.com/photos/abc".into(),
                thumb: "https://img/abc-small.jpg".into(),
                full: "https://img/abc.jpg?ixid=1".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_keyword_is_validation_error() {
        let client = UnsplashClient::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        assert!(matches!(client.search("  ", 1, 12).await, Err(VersecardError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let client = UnsplashClient::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
        let err = client.search("sunrise", 1, 12).await.unwrap_err();
        assert!(err.is_config());
    }
}
