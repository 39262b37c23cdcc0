//! Cart state and its pure mutations.
//!
//! The cart is an ordered list of lines keyed by [`LineId`] (product +
//! variant), plus the lazily-created checkout reference. The mutations here
//! are pure so the coordinator in `services::cart` can apply them only after
//! the corresponding remote call has succeeded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use nonna_rues_core::{CheckoutId, LineId, ProductId, VariantId};

/// One line in the cart.
///
/// Identity is `line_id`, not `product_id`: two lines for the same product
/// but different variants are distinct lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: LineId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub title: String,
    pub unit_price: Decimal,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The cart owned by one session.
///
/// `lines` and `checkout_id` are mirrored into the session store on every
/// mutation; the checkout URL is transient and re-fetched when needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartState {
    pub lines: Vec<CartLine>,
    pub checkout_id: Option<CheckoutId>,
    #[serde(skip)]
    pub checkout_url: Option<String>,
}

impl CartState {
    /// Find a line by its identity key.
    #[must_use]
    pub fn find_line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.line_id == line_id)
    }

    /// Merge a line into the cart.
    ///
    /// If a line with the same identity already exists its quantity is
    /// increased by the incoming quantity; otherwise the line is appended.
    pub fn merge_line(&mut self, line: CartLine) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.line_id == line.line_id) {
            existing.quantity += line.quantity;
        } else {
            self.lines.push(line);
        }
    }

    /// Replace the quantity of an existing line.
    ///
    /// Returns `false` if no line with this identity exists.
    pub fn set_quantity(&mut self, line_id: &LineId, quantity: u32) -> bool {
        match self.lines.iter_mut().find(|l| &l.line_id == line_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Removing an absent line is a no-op.
    ///
    /// Returns `true` if a line was actually removed.
    pub fn remove_line(&mut self, line_id: &LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.line_id != line_id);
        self.lines.len() != before
    }

    /// Drop every line. The checkout reference is retained.
    pub fn clear_lines(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product: &str, variant: &str, quantity: u32) -> CartLine {
        let product_id = ProductId::new(product);
        let variant_id = VariantId::new(variant);
        CartLine {
            line_id: LineId::for_variant(&product_id, &variant_id),
            product_id,
            variant_id,
            title: "Hand-Painted Vase".to_string(),
            unit_price: Decimal::new(2450, 2),
            image_url: None,
            quantity,
        }
    }

    #[test]
    fn test_merge_new_line_keeps_requested_quantity() {
        let mut cart = CartState::default();
        cart.merge_line(line("p-1", "v-1", 2));

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_merge_existing_line_adds_quantities() {
        let mut cart = CartState::default();
        cart.merge_line(line("p-1", "v-1", 2));
        cart.merge_line(line("p-1", "v-1", 3));

        // Same product + variant merges into one line, not a second one
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_different_variants_stay_distinct() {
        let mut cart = CartState::default();
        cart.merge_line(line("p-1", "v-1", 1));
        cart.merge_line(line("p-1", "v-2", 1));

        assert_eq!(cart.lines.len(), 2);
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = CartState::default();
        cart.merge_line(line("p-1", "v-1", 2));

        let id = cart.lines.first().unwrap().line_id.clone();
        assert!(cart.set_quantity(&id, 7));
        assert_eq!(cart.lines.first().unwrap().quantity, 7);
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut cart = CartState::default();
        cart.merge_line(line("p-1", "v-1", 2));

        let missing = LineId::new("p-9/v-9");
        assert!(!cart.set_quantity(&missing, 1));
        assert_eq!(cart.lines.first().unwrap().quantity, 2);
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let mut cart = CartState::default();
        cart.merge_line(line("p-1", "v-1", 2));

        let id = cart.lines.first().unwrap().line_id.clone();
        assert!(cart.remove_line(&id));
        assert!(cart.is_empty());

        // Removing again neither errors nor changes anything
        assert!(!cart.remove_line(&id));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let mut cart = CartState::default();
        cart.merge_line(line("p-1", "v-1", 2));
        cart.merge_line(line("p-2", "v-3", 1));

        // 3 units at 24.50 each
        assert_eq!(cart.subtotal(), Decimal::new(7350, 2));
    }

    #[test]
    fn test_checkout_url_not_persisted() {
        let mut cart = CartState::default();
        cart.checkout_id = Some(CheckoutId::new("chk-1"));
        cart.checkout_url = Some("https://checkout.example/chk-1".to_string());

        let json = serde_json::to_string(&cart).unwrap();
        let restored: CartState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.checkout_id, Some(CheckoutId::new("chk-1")));
        assert!(restored.checkout_url.is_none());
    }
}
