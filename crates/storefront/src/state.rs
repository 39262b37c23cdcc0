//! Application state shared across handlers.

use std::sync::Arc;

use crate::commerce::{BackendClient, CheckoutClient, CheckoutError};
use crate::config::StorefrontConfig;
use crate::services::SiteService;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("checkout client error: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the API clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    backend: BackendClient,
    checkout: CheckoutClient,
    site: SiteService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let backend = BackendClient::new(&config.backend);
        let checkout = CheckoutClient::new(&config.checkout)?;
        let site = SiteService::new(backend.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                checkout,
                site,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the hosted checkout client.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutClient {
        &self.inner.checkout
    }

    /// Get a reference to the site configuration service.
    #[must_use]
    pub fn site(&self) -> &SiteService {
        &self.inner.site
    }
}
