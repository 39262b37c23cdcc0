//! Domain models for the storefront.

pub mod cart;
pub mod session;
pub mod site;

pub use cart::{CartLine, CartState};
pub use session::{CurrentUser, is_authenticated_admin, session_keys};
pub use site::SiteConfig;
