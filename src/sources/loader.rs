//! # Photo Loading
//!
//! Downloads and decodes background photos. The most recently used decoded
//! images are cached by URL, so toggling between palette and photo mode does
//! not refetch. Older entries are evicted once [`CACHE_CAPACITY`] is reached.

use async_trait::async_trait;
use image::DynamicImage;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::VersecardError;

/// Decoded photos kept per loader.
pub const CACHE_CAPACITY: usize = 4;

#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<DynamicImage, VersecardError>;
}

pub struct HttpImageLoader {
    client: reqwest::Client,
    /// Oldest first.
    cache: Arc<RwLock<VecDeque<(String, DynamicImage)>>>,
    capacity: usize,
}

impl HttpImageLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_capacity(client, CACHE_CAPACITY)
    }

    pub fn with_capacity(client: reqwest::Client, capacity: usize) -> Self {
        Self {
            client,
            cache: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub async fn cached(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.cache.read().await.iter().any(|(key, _)| key == url)
    }

    async fn remember(&self, url: &str, image: &DynamicImage) {
        if self.capacity == 0 {
            return;
        }
        let mut cache = self.cache.write().await;
        cache.retain(|(key, _)| key != url);
        while cache.len() >= self.capacity {
            if let Some((evicted, _)) = cache.pop_front() {
                tracing::debug!(url = %evicted, "photo evicted from cache");
            }
        }
        cache.push_back((url.to_string(), image.clone()));
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<DynamicImage, VersecardError> {
        {
            let mut cache = self.cache.write().await;
            if let Some(pos) = cache.iter().position(|(key, _)| key == url) {
                // Move to the back so it is evicted last
                if let Some(entry) = cache.remove(pos) {
                    let image = entry.1.clone();
                    cache.push_back(entry);
                    tracing::debug!(url, "photo cache hit");
                    return Ok(image);
                }
            }
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VersecardError::Image(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(VersecardError::Image(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| VersecardError::Image(format!("Failed to read image data: {}", e)))?;

        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| VersecardError::Image(format!("Decode task failed: {}", e)))?
            .map_err(|e| VersecardError::Image(format!("Failed to decode image: {}", e)))?;

        tracing::debug!(url, width = image.width(), height = image.height(), "photo loaded");
        self.remember(url, &image).await;
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_image_error() {
        let loader = HttpImageLoader::new(reqwest::Client::new());
        let err = loader.load("http://127.0.0.1:9/photo.jpg").await.unwrap_err();
        assert!(matches!(err, VersecardError::Image(_)));
        assert_eq!(loader.cached().await, 0);
    }
}
