//! Session-backed application services.
//!
//! Each service owns one domain of state: authentication, the cart, and the
//! site configuration. Services are built per request from borrowed pieces of
//! [`crate::state::AppState`] plus the caller's session; nothing here is a
//! module-level singleton.

pub mod auth;
pub mod cart;
pub mod site;

pub use auth::{AuthError, AuthService};
pub use cart::{AddLineRequest, CartError, CartService};
pub use site::SiteService;
