//! HTTP clients for the two external collaborators.
//!
//! # Architecture
//!
//! - [`BackendClient`] talks to the commerce backend API: products,
//!   collections, user accounts, and site configuration. The backend proxies
//!   the commerce platform's admin surface and owns authentication.
//! - [`CheckoutClient`] talks to the hosted checkout API: checkout creation
//!   and line-item mutations, keyed by a checkout reference id. Payment
//!   itself completes on the hosted `webUrl`, never here.
//!
//! Both speak plain JSON over `reqwest`. Product and collection reads are
//! cached in-memory via `moka` (5 minute TTL); nothing else is cached.

pub mod backend;
pub mod checkout;
pub mod types;

pub use backend::{BackendClient, BackendError};
pub use checkout::{CheckoutClient, CheckoutError};
pub use types::*;
