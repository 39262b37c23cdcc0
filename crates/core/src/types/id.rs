//! Newtype ids for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe id wrappers that prevent
//! accidentally mixing ids from different entity types. Ids here wrap the
//! opaque string identifiers handed out by the commerce platform (e.g.
//! `gid://shop/ProductVariant/123`), so the inner representation is `String`.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe id wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use nonna_rues_core::define_id;
/// define_id!(ProductId);
/// define_id!(VariantId);
///
/// let product_id = ProductId::new("gid://shop/Product/1");
/// let variant_id = VariantId::new("gid://shop/ProductVariant/1");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = variant_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the id and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity ids
define_id!(UserId);
define_id!(ProductId);
define_id!(VariantId);
define_id!(CollectionId);
define_id!(CheckoutId);
define_id!(LineId);

impl LineId {
    /// Derive the cart line identity for a product variant.
    ///
    /// Line identity is product + variant: adding the same variant twice
    /// merges into one line, while a different variant of the same product
    /// gets its own line.
    #[must_use]
    pub fn for_variant(product_id: &ProductId, variant_id: &VariantId) -> Self {
        Self(format!("{}/{}", product_id.as_str(), variant_id.as_str()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_roundtrip() {
        let id = ProductId::new("gid://shop/Product/42");
        assert_eq!(id.to_string(), "gid://shop/Product/42");
        assert_eq!(id.as_str(), "gid://shop/Product/42");
    }

    #[test]
    fn test_serde_transparent() {
        let id = VariantId::new("v-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"v-1\"");
        let parsed: VariantId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_line_id_distinguishes_variants() {
        let product = ProductId::new("p-1");
        let a = LineId::for_variant(&product, &VariantId::new("v-1"));
        let b = LineId::for_variant(&product, &VariantId::new("v-2"));
        assert_ne!(a, b);
        assert_eq!(a, LineId::for_variant(&product, &VariantId::new("v-1")));
    }
}
