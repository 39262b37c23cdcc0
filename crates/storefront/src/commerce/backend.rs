//! Commerce backend API client.
//!
//! Covers the four backend domains: product catalog, collections, user
//! accounts, and site configuration. Privileged calls (product CRUD, profile,
//! configuration writes) carry `Authorization: Bearer <token>`.
//!
//! Catalog reads are cached for 5 minutes; catalog writes invalidate the
//! whole cache so the admin console never lists stale data.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

use nonna_rues_core::ProductId;

use crate::config::BackendConfig;
use crate::models::SiteConfig;

use super::types::{
    ApiUser, AuthPayload, Collection, CollectionsEnvelope, ConfigEnvelope, Product, ProductEnvelope,
    ProductInput, ProductPage, ProductQuery, ProfileInput, UserEnvelope,
};

/// Cache TTL for catalog reads.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl BackendError {
    /// Whether the backend rejected the caller's credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

/// Cached catalog responses.
#[derive(Clone)]
enum CacheValue {
    Page(Box<ProductPage>),
    Product(Box<Product>),
    Collections(Vec<Collection>),
}

/// Client for the commerce backend API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Read a JSON body after mapping error statuses.
    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::NotFound(message));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Get a page of the product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, query: &ProductQuery) -> Result<ProductPage, BackendError> {
        let cache_key = format!(
            "products:{}:{}",
            query.page.unwrap_or(1),
            query.search.as_deref().unwrap_or("")
        );

        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product page");
            return Ok(*page);
        }

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }

        let response = self
            .inner
            .client
            .get(self.url("/shopify/products"))
            .query(&params)
            .send()
            .await?;
        let page: ProductPage = Self::read_json(response).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Page(Box::new(page.clone())))
            .await;

        Ok(page)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, BackendError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let response = self
            .inner
            .client
            .get(self.url(&format!("/shopify/products/{product_id}")))
            .send()
            .await?;
        let envelope: ProductEnvelope = Self::read_json(response).await?;

        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Product(Box::new(envelope.product.clone())),
            )
            .await;

        Ok(envelope.product)
    }

    /// Create a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request.
    #[instrument(skip(self, token, input))]
    pub async fn create_product(
        &self,
        input: &ProductInput,
        token: &str,
    ) -> Result<Product, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/shopify/products"))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;
        let envelope: ProductEnvelope = Self::read_json(response).await?;

        self.inner.cache.invalidate_all();
        Ok(envelope.product)
    }

    /// Update a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request.
    #[instrument(skip(self, token, input), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: &ProductId,
        input: &ProductInput,
        token: &str,
    ) -> Result<Product, BackendError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/shopify/products/{product_id}")))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;
        let envelope: ProductEnvelope = Self::read_json(response).await?;

        self.inner.cache.invalidate_all();
        Ok(envelope.product)
    }

    /// Delete a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the request.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn delete_product(
        &self,
        product_id: &ProductId,
        token: &str,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .delete(self.url(&format!("/shopify/products/{product_id}")))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(product_id.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        self.inner.cache.invalidate_all();
        Ok(())
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Get all collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, BackendError> {
        let cache_key = "collections".to_string();

        if let Some(CacheValue::Collections(collections)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let response = self
            .inner
            .client
            .get(self.url("/shopify/collections"))
            .send()
            .await?;
        let envelope: CollectionsEnvelope = Self::read_json(response).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Collections(envelope.collections.clone()))
            .await;

        Ok(envelope.collections)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with status 401 on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/users/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/users/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Fetch the profile belonging to a token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with status 401 if the token is no longer
    /// accepted.
    #[instrument(skip(self, token))]
    pub async fn get_profile(&self, token: &str) -> Result<ApiUser, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/users/profile"))
            .bearer_auth(token)
            .send()
            .await?;
        let envelope: UserEnvelope = Self::read_json(response).await?;
        Ok(envelope.user)
    }

    /// Update the profile belonging to a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update.
    #[instrument(skip(self, token, input))]
    pub async fn update_profile(
        &self,
        input: &ProfileInput,
        token: &str,
    ) -> Result<ApiUser, BackendError> {
        let response = self
            .inner
            .client
            .put(self.url("/users/profile"))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;
        let envelope: UserEnvelope = Self::read_json(response).await?;
        Ok(envelope.user)
    }

    // =========================================================================
    // Site Configuration
    // =========================================================================

    /// Fetch the site configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; callers are expected to
    /// fall back to [`SiteConfig::default`].
    #[instrument(skip(self))]
    pub async fn get_site_config(&self) -> Result<SiteConfig, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/cms/config"))
            .send()
            .await?;
        let envelope: ConfigEnvelope = Self::read_json(response).await?;
        Ok(envelope.config)
    }

    /// Write site configuration (admin only).
    ///
    /// The backend merges the partial document server-side and returns the
    /// canonical merged configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update.
    #[instrument(skip(self, token, partial))]
    pub async fn put_site_config(
        &self,
        partial: &serde_json::Value,
        token: &str,
    ) -> Result<SiteConfig, BackendError> {
        let response = self
            .inner
            .client
            .put(self.url("/cms/config"))
            .bearer_auth(token)
            .json(partial)
            .send()
            .await?;
        let envelope: ConfigEnvelope = Self::read_json(response).await?;
        Ok(envelope.config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("product p-1".to_string());
        assert_eq!(err.to_string(), "Not found: product p-1");

        let err = BackendError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }

    #[test]
    fn test_is_unauthorized() {
        let unauthorized = BackendError::Api {
            status: 401,
            message: String::new(),
        };
        let forbidden = BackendError::Api {
            status: 403,
            message: String::new(),
        };
        let server = BackendError::Api {
            status: 500,
            message: String::new(),
        };

        assert!(unauthorized.is_unauthorized());
        assert!(forbidden.is_unauthorized());
        assert!(!server.is_unauthorized());
    }
}
