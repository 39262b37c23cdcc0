//! Wire types for the backend API and the hosted checkout API.
//!
//! Both collaborators serialize with camelCase keys. Only the fields this
//! application actually reads are modeled; unknown fields are ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nonna_rues_core::{CheckoutId, CollectionId, Email, LineId, ProductId, Role, UserId, VariantId};

// =============================================================================
// Catalog Types
// =============================================================================

/// A product in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// Product type/category.
    #[serde(default)]
    pub product_type: String,
    /// Vendor name.
    #[serde(default)]
    pub vendor: String,
    /// Primary image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Representative price (lowest variant).
    pub price: Decimal,
    /// Product variants.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Find a variant by id.
    #[must_use]
    pub fn variant(&self, variant_id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == variant_id)
    }
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant id.
    pub id: VariantId,
    /// Variant title (combination of option values).
    pub title: String,
    /// Current price.
    pub price: Decimal,
    /// Whether this variant is available for sale.
    #[serde(default = "default_true")]
    pub available_for_sale: bool,
}

const fn default_true() -> bool {
    true
}

/// A collection of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Collection id.
    pub id: CollectionId,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// Collection image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One page of the product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Current page number (1-based).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Total number of pages.
    #[serde(default = "default_page")]
    pub total_pages: u32,
}

const fn default_page() -> u32 {
    1
}

/// Query parameters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Page number (1-based).
    pub page: Option<u32>,
    /// Free-text search term.
    pub search: Option<String>,
}

/// Input for creating or updating a product (admin only).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub product_type: String,
    pub vendor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// =============================================================================
// User Types
// =============================================================================

/// A user record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    /// Backend user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Account role.
    #[serde(default)]
    pub role: Role,
}

/// Successful login/register response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// The authenticated user.
    pub user: ApiUser,
    /// Bearer token for subsequent privileged calls.
    pub token: String,
}

/// Input for updating the current user's profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
}

// =============================================================================
// Checkout Types
// =============================================================================

/// A checkout held by the hosted commerce platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    /// Checkout reference id.
    pub id: CheckoutId,
    /// URL where the visitor completes payment. Not every mutation response
    /// carries one; consumers treat it as best-effort.
    #[serde(default)]
    pub web_url: Option<String>,
    /// Line items the platform currently knows about.
    #[serde(default)]
    pub line_items: Vec<CheckoutLineItem>,
}

/// A line item as the hosted checkout reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineItem {
    /// Line id.
    pub id: LineId,
    /// Variant this line refers to.
    pub variant_id: VariantId,
    /// Quantity.
    pub quantity: u32,
}

/// Input for adding a line to a checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineInput {
    /// Variant to add.
    pub variant_id: VariantId,
    /// Quantity to add.
    pub quantity: u32,
}

/// Input for updating a checkout line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLineUpdate {
    /// Line to update.
    pub id: LineId,
    /// New quantity.
    pub quantity: u32,
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// `{ "product": ... }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}

/// `{ "collections": [...] }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct CollectionsEnvelope {
    pub collections: Vec<Collection>,
}

/// `{ "user": ... }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: ApiUser,
}

/// `{ "config": ... }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigEnvelope {
    pub config: crate::models::SiteConfig,
}
