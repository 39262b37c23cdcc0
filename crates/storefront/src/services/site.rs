//! Site configuration cache.
//!
//! Reads are cached in-memory with a short TTL and fail open: if the backend
//! is unreachable the documented default configuration is served, so the
//! views never render with missing presentation data. Writes go through the
//! backend, which merges partial updates server-side; the canonical merged
//! result replaces the cached copy wholesale to avoid drift.

use std::time::Duration;

use moka::future::Cache;
use tracing::instrument;

use crate::commerce::{BackendClient, BackendError};
use crate::models::SiteConfig;

/// Cache TTL for the site configuration.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// The single cache key.
const CACHE_KEY: &str = "site_config";

/// Site configuration service.
#[derive(Clone)]
pub struct SiteService {
    backend: BackendClient,
    cache: Cache<&'static str, SiteConfig>,
}

impl SiteService {
    /// Create a new site configuration service.
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(CACHE_TTL)
            .build();

        Self { backend, cache }
    }

    /// Load the site configuration.
    ///
    /// Infallible by policy: a backend failure falls back to
    /// [`SiteConfig::default`] and is only logged. The fallback is not
    /// cached, so the next request retries the backend.
    #[instrument(skip(self))]
    pub async fn load(&self) -> SiteConfig {
        if let Some(config) = self.cache.get(CACHE_KEY).await {
            return config;
        }

        match self.backend.get_site_config().await {
            Ok(config) => {
                self.cache.insert(CACHE_KEY, config.clone()).await;
                config
            }
            Err(e) => {
                tracing::warn!("Failed to fetch site configuration, using defaults: {e}");
                SiteConfig::default()
            }
        }
    }

    /// Write a partial configuration update (admin only).
    ///
    /// The backend merges and returns the canonical configuration, which
    /// replaces the cached copy wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, partial, token))]
    pub async fn save(
        &self,
        partial: &serde_json::Value,
        token: &str,
    ) -> Result<SiteConfig, BackendError> {
        let config = self.backend.put_site_config(partial, token).await?;
        self.cache.insert(CACHE_KEY, config.clone()).await;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[tokio::test]
    async fn test_load_falls_back_to_defaults_when_backend_is_down() {
        // Nothing listens on the discard port; the fetch fails immediately
        let backend = BackendClient::new(&BackendConfig {
            api_url: "http://127.0.0.1:9/api".to_string(),
        });
        let site = SiteService::new(backend);

        let config = site.load().await;

        // The full default document, never an empty or partial one
        assert_eq!(config.site_name, SiteConfig::default().site_name);
        assert_eq!(config.colors.primary, "#a67c52");
        assert_eq!(config.footer_links.len(), 4);
        assert!(!config.about_section.content.is_empty());
    }
}
