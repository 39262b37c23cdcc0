//! Hosted checkout API client.
//!
//! Four operations, each keyed by a checkout reference id and returning the
//! updated checkout: create, add line items, update line items, remove line
//! items. A fifth read fetches an existing checkout so the storefront can
//! redirect to its `webUrl` at payment time.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::json;
use thiserror::Error;
use tracing::instrument;

use nonna_rues_core::{CheckoutId, LineId};

use crate::config::CheckoutConfig;

use super::types::{Checkout, CheckoutLineInput, CheckoutLineUpdate};

/// Errors that can occur when talking to the hosted checkout API.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the hosted checkout API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct CheckoutClient {
    inner: Arc<CheckoutClientInner>,
}

struct CheckoutClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CheckoutClient {
    /// Create a new checkout API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "X-Checkout-Access-Token",
            HeaderValue::from_str(config.access_token.expose_secret())
                .map_err(|e| CheckoutError::Parse(format!("Invalid access token format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(CheckoutClientInner {
                client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Read a checkout body after mapping error statuses.
    async fn read_checkout(response: reqwest::Response) -> Result<Checkout, CheckoutError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CheckoutError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| CheckoutError::Parse(e.to_string()))
    }

    /// Create a new, empty checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn create_checkout(&self) -> Result<Checkout, CheckoutError> {
        let response = self
            .inner
            .client
            .post(self.url("/checkouts"))
            .json(&json!({}))
            .send()
            .await?;
        Self::read_checkout(response).await
    }

    /// Fetch an existing checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(checkout_id = %checkout_id))]
    pub async fn get_checkout(&self, checkout_id: &CheckoutId) -> Result<Checkout, CheckoutError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/checkouts/{checkout_id}")))
            .send()
            .await?;
        Self::read_checkout(response).await
    }

    /// Add line items to a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, lines), fields(checkout_id = %checkout_id))]
    pub async fn add_line_items(
        &self,
        checkout_id: &CheckoutId,
        lines: Vec<CheckoutLineInput>,
    ) -> Result<Checkout, CheckoutError> {
        let response = self
            .inner
            .client
            .post(self.url(&format!("/checkouts/{checkout_id}/line-items")))
            .json(&json!({ "lineItems": lines }))
            .send()
            .await?;
        Self::read_checkout(response).await
    }

    /// Replace quantities on existing checkout lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, lines), fields(checkout_id = %checkout_id))]
    pub async fn update_line_items(
        &self,
        checkout_id: &CheckoutId,
        lines: Vec<CheckoutLineUpdate>,
    ) -> Result<Checkout, CheckoutError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/checkouts/{checkout_id}/line-items")))
            .json(&json!({ "lineItems": lines }))
            .send()
            .await?;
        Self::read_checkout(response).await
    }

    /// Remove line items from a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, line_ids), fields(checkout_id = %checkout_id))]
    pub async fn remove_line_items(
        &self,
        checkout_id: &CheckoutId,
        line_ids: Vec<LineId>,
    ) -> Result<Checkout, CheckoutError> {
        let response = self
            .inner
            .client
            .post(self.url(&format!("/checkouts/{checkout_id}/line-items/remove")))
            .json(&json!({ "lineItemIds": line_ids }))
            .send()
            .await?;
        Self::read_checkout(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_error_display() {
        let err = CheckoutError::Api {
            status: 502,
            message: "upstream".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 502 - upstream");
    }

    #[test]
    fn test_checkout_deserializes_without_url() {
        // Mutation responses are allowed to omit the web URL
        let checkout: Checkout =
            serde_json::from_str(r#"{"id":"chk-1","lineItems":[]}"#).unwrap();
        assert_eq!(checkout.id, CheckoutId::new("chk-1"));
        assert!(checkout.web_url.is_none());
    }
}
