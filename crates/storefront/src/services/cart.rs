//! Cart coordinator.
//!
//! Orchestrates the three-way dance between the session, the local cart
//! state, and the hosted checkout. Order matters on every mutation: ensure a
//! checkout exists, mirror the change to the remote checkout, and only then
//! apply the change locally and persist it - a remote failure must leave the
//! prior local state untouched.
//!
//! Rapid duplicate mutations from one visitor are not serialized; the last
//! response to resolve wins.

use rust_decimal::Decimal;
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use nonna_rues_core::{CheckoutId, LineId, ProductId, VariantId};

use crate::commerce::{CheckoutClient, CheckoutError, CheckoutLineInput, CheckoutLineUpdate};
use crate::models::{CartLine, CartState, session_keys};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The hosted checkout rejected or failed a remote call.
    #[error("checkout unavailable: {0}")]
    Unavailable(#[from] CheckoutError),

    /// No cart line with this identity.
    #[error("cart line not found: {0}")]
    LineNotFound(LineId),

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Everything needed to add one line to the cart.
#[derive(Debug, Clone)]
pub struct AddLineRequest {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub title: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
    pub quantity: u32,
}

/// Cart coordinator bound to one visitor's session.
pub struct CartService<'a> {
    checkout: &'a CheckoutClient,
    session: &'a Session,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(checkout: &'a CheckoutClient, session: &'a Session) -> Self {
        Self { checkout, session }
    }

    /// Load the cart from the session. Absent keys mean an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn current(&self) -> Result<CartState, CartError> {
        let lines = self
            .session
            .get::<Vec<CartLine>>(session_keys::CART_ITEMS)
            .await?
            .unwrap_or_default();
        let checkout_id = self
            .session
            .get::<CheckoutId>(session_keys::CHECKOUT_ID)
            .await?;

        Ok(CartState {
            lines,
            checkout_id,
            checkout_url: None,
        })
    }

    /// Make sure a checkout reference exists, creating one lazily.
    ///
    /// Idempotent: an existing reference is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unavailable` if a new checkout cannot be created.
    #[instrument(skip(self))]
    pub async fn ensure_checkout(&self) -> Result<CheckoutId, CartError> {
        let mut cart = self.current().await?;
        self.ensure_checkout_on(&mut cart).await
    }

    async fn ensure_checkout_on(&self, cart: &mut CartState) -> Result<CheckoutId, CartError> {
        if let Some(id) = &cart.checkout_id {
            return Ok(id.clone());
        }

        let checkout = self.checkout.create_checkout().await?;
        cart.checkout_id = Some(checkout.id.clone());
        cart.checkout_url = checkout.web_url;
        self.persist(cart).await?;

        tracing::debug!(checkout_id = %checkout.id, "created checkout");
        Ok(checkout.id)
    }

    /// Add a line to the cart.
    ///
    /// A line with the same product + variant identity merges quantities; a
    /// new identity appends. A quantity below 1 is rejected as a no-op, not
    /// clamped.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unavailable` if the remote mirror fails; the
    /// local cart is left untouched in that case.
    #[instrument(skip(self, req), fields(variant_id = %req.variant_id, quantity = req.quantity))]
    pub async fn add_line(&self, req: AddLineRequest) -> Result<CartState, CartError> {
        let mut cart = self.current().await?;

        if req.quantity < 1 {
            return Ok(cart);
        }

        let checkout_id = self.ensure_checkout_on(&mut cart).await?;

        // Mirror to the remote checkout before touching local state
        let checkout = self
            .checkout
            .add_line_items(
                &checkout_id,
                vec![CheckoutLineInput {
                    variant_id: req.variant_id.clone(),
                    quantity: req.quantity,
                }],
            )
            .await?;

        let line_id = LineId::for_variant(&req.product_id, &req.variant_id);
        cart.merge_line(CartLine {
            line_id,
            product_id: req.product_id,
            variant_id: req.variant_id,
            title: req.title,
            unit_price: req.unit_price,
            image_url: req.image_url,
            quantity: req.quantity,
        });
        if checkout.web_url.is_some() {
            cart.checkout_url = checkout.web_url;
        }

        self.persist(&cart).await?;
        Ok(cart)
    }

    /// Replace the quantity of an existing line.
    ///
    /// A quantity below 1 is a no-op (use [`Self::remove_line`] instead).
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` for an unknown line, or
    /// `CartError::Unavailable` if the remote update fails.
    #[instrument(skip(self), fields(line_id = %line_id, quantity))]
    pub async fn set_quantity(
        &self,
        line_id: &LineId,
        quantity: u32,
    ) -> Result<CartState, CartError> {
        let mut cart = self.current().await?;

        if quantity < 1 {
            return Ok(cart);
        }

        if cart.find_line(line_id).is_none() {
            return Err(CartError::LineNotFound(line_id.clone()));
        }

        let checkout_id = self.ensure_checkout_on(&mut cart).await?;
        let checkout = self
            .checkout
            .update_line_items(
                &checkout_id,
                vec![CheckoutLineUpdate {
                    id: line_id.clone(),
                    quantity,
                }],
            )
            .await?;

        cart.set_quantity(line_id, quantity);
        if checkout.web_url.is_some() {
            cart.checkout_url = checkout.web_url;
        }

        self.persist(&cart).await?;
        Ok(cart)
    }

    /// Remove a line from the cart.
    ///
    /// Idempotent: a line id that is not in the cart returns the cart
    /// unchanged without error and without a remote call. The checkout-URL
    /// update from the response is best-effort - a response without a usable
    /// URL still succeeds locally.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unavailable` if the remote removal fails.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn remove_line(&self, line_id: &LineId) -> Result<CartState, CartError> {
        let mut cart = self.current().await?;

        if cart.find_line(line_id).is_none() {
            return Ok(cart);
        }

        let checkout_id = self.ensure_checkout_on(&mut cart).await?;
        let checkout = self
            .checkout
            .remove_line_items(&checkout_id, vec![line_id.clone()])
            .await?;

        cart.remove_line(line_id);
        if checkout.web_url.is_some() {
            cart.checkout_url = checkout.web_url;
        }

        self.persist(&cart).await?;
        Ok(cart)
    }

    /// Drop every line from the cart. The checkout reference is retained.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<CartState, CartError> {
        let mut cart = self.current().await?;
        cart.clear_lines();
        self.session
            .remove::<Vec<CartLine>>(session_keys::CART_ITEMS)
            .await?;
        Ok(cart)
    }

    /// The payment URL for the current checkout, fetched fresh.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unavailable` if the checkout cannot be fetched.
    #[instrument(skip(self))]
    pub async fn checkout_url(&self) -> Result<Option<String>, CartError> {
        let cart = self.current().await?;
        match cart.checkout_id {
            Some(id) => {
                let checkout = self.checkout.get_checkout(&id).await?;
                Ok(checkout.web_url)
            }
            None => Ok(None),
        }
    }

    async fn persist(&self, cart: &CartState) -> Result<(), CartError> {
        self.session
            .insert(session_keys::CART_ITEMS, &cart.lines)
            .await?;
        if let Some(id) = &cart.checkout_id {
            self.session.insert(session_keys::CHECKOUT_ID, id).await?;
        }
        Ok(())
    }
}
