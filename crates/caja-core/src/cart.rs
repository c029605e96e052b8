//! # Cart
//!
//! The line items of one in-progress sale.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation              Effect on lines                                 │
//! │  ─────────              ───────────────                                 │
//! │  add_item(p, n)         existing: quantity += n   new: push at the end  │
//! │  update_quantity(id,n)  n <= 0: remove            else: quantity = n    │
//! │  set_line_discount      discount = rate                                 │
//! │  remove_item(id)        drop line (absent id is a no-op)                │
//! │  clear()                drop all lines                                  │
//! │                                                                         │
//! │  After EVERY operation, for every line:                                 │
//! │    subtotal == quantity × unit_price × (1 − discount)                   │
//! │    quantity >= 1                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines keep insertion order for display. A `Vec` with a linear lookup by
//! product id is enough for a hand-held register's cart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DiscountRate, Product, ProductId};
use crate::validation::validate_discount_rate;

// =============================================================================
// Line Item
// =============================================================================

/// One product's entry in the cart.
///
/// Fields are private so that `subtotal` can only change through
/// [`LineItem::recompute`], which every mutating cart operation calls.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    product_id: ProductId,
    /// Product as it was when first added. Catalog edits do not reach it.
    product: Product,
    quantity: i64,
    /// Frozen at insertion time.
    unit_price: Money,
    discount: DiscountRate,
    subtotal: Money,
    #[ts(as = "String")]
    added_at: DateTime<Utc>,
}

impl LineItem {
    fn from_product(product: &Product, quantity: i64) -> Self {
        let mut item = LineItem {
            product_id: product.id,
            product: product.clone(),
            quantity,
            unit_price: product.price(),
            discount: DiscountRate::zero(),
            subtotal: Money::zero(),
            added_at: Utc::now(),
        };
        item.recompute();
        item
    }

    fn recompute(&mut self) {
        self.subtotal = self.unit_price.extend_discounted(self.quantity, self.discount);
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn discount(&self) -> DiscountRate {
        self.discount
    }

    /// Line total after the line discount.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart of one sale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
    /// When the cart was created or last cleared.
    created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds `quantity` units of a product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases, unit price and
    ///   discount stay as they were
    /// - Product not in cart: new line at the end, price frozen now,
    ///   no discount
    ///
    /// Quantities are not range-checked. A non-positive quantity that would
    /// leave a line at zero or below removes that line instead, and is
    /// ignored for a product that has no line yet. Quantities and subtotals
    /// saturate at `i64::MAX` rather than overflowing.
    pub fn add_item(&mut self, product: &Product, quantity: i64) {
        if let Some(index) = self.position(product.id) {
            let new_quantity = self.items[index].quantity.saturating_add(quantity);
            if new_quantity <= 0 {
                self.items.remove(index);
                return;
            }
            let item = &mut self.items[index];
            item.quantity = new_quantity;
            item.recompute();
            return;
        }

        if quantity <= 0 {
            return;
        }

        self.items.push(LineItem::from_product(product, quantity));
    }

    /// Removes the line for a product.
    ///
    /// Returns whether a line was removed. An absent product is not an error.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        match self.position(product_id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Sets the absolute quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`Cart::remove_item`]
    /// - Product not in cart: no-op
    ///
    /// Returns whether the cart changed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        match self.item_mut(product_id) {
            Some(item) => {
                item.quantity = quantity;
                item.recompute();
                true
            }
            None => false,
        }
    }

    /// Sets the percentage discount of one line.
    ///
    /// ## Errors
    /// - `Validation` if the rate is above 100%
    /// - `NotInCart` if the product has no line
    pub fn set_line_discount(&mut self, product_id: ProductId, rate: DiscountRate) -> CoreResult<()> {
        validate_discount_rate(rate)?;

        let item = self
            .item_mut(product_id)
            .ok_or(CoreError::NotInCart(product_id))?;
        item.discount = rate;
        item.recompute();
        Ok(())
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |total, i| total.saturating_add(i.quantity))
    }

    /// Sum of line subtotals (after line discounts).
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(|i| i.subtotal).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    fn item_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.product_id == product_id)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Cart totals summary for the cart panel and checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_items: i64,
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_items: cart.total_items(),
            subtotal: cart.subtotal(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: ProductId, price_cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_cents(price_cents))
    }

    fn assert_lines_consistent(cart: &Cart) {
        for item in cart.items() {
            assert!(item.quantity() >= 1, "line {} has quantity {}", item.product_id(), item.quantity());
            let expected = item
                .unit_price()
                .multiply_quantity(item.quantity())
                .apply_discount(item.discount());
            assert_eq!(item.subtotal(), expected, "line {} subtotal is stale", item.product_id());
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 999), 2);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);

        let line = cart.item(1).unwrap();
        assert_eq!(line.unit_price().cents(), 999);
        assert!(line.discount().is_zero());
        assert_eq!(line.subtotal().cents(), 1998);
    }

    #[test]
    fn test_cart_add_same_product_accumulates() {
        let mut cart = Cart::new();
        let product = test_product(1, 999);

        cart.add_item(&product, 3);
        cart.add_item(&product, 3);

        let mut once = Cart::new();
        once.add_item(&product, 6);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.totals(), once.totals());
    }

    #[test]
    fn test_unit_price_frozen_at_insertion() {
        let mut cart = Cart::new();
        let mut product = test_product(1, 1000);
        cart.add_item(&product, 1);

        product.price_cents = 2500;
        cart.add_item(&product, 1);

        let line = cart.item(1).unwrap();
        assert_eq!(line.unit_price().cents(), 1000);
        assert_eq!(line.product().price_cents, 1000);
        assert_eq!(line.subtotal().cents(), 2000);
    }

    #[test]
    fn test_add_keeps_existing_discount() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000);
        cart.add_item(&product, 1);
        cart.set_line_discount(1, DiscountRate::from_percent(10)).unwrap();

        cart.add_item(&product, 1);

        let line = cart.item(1).unwrap();
        assert_eq!(line.discount(), DiscountRate::from_percent(10));
        assert_eq!(line.subtotal().cents(), 1800);
        assert_lines_consistent(&cart);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(3, 100), 1);
        cart.add_item(&test_product(1, 100), 1);
        cart.add_item(&test_product(2, 100), 1);
        cart.add_item(&test_product(3, 100), 1);

        let ids: Vec<ProductId> = cart.items().iter().map(LineItem::product_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 100), 1);

        assert!(cart.remove_item(1));
        assert!(cart.is_empty());
        assert!(!cart.remove_item(1));
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        for quantity in [0, -5] {
            let mut cart = Cart::new();
            cart.add_item(&test_product(1, 100), 2);
            cart.add_item(&test_product(2, 100), 1);

            let mut removed = cart.clone();
            removed.remove_item(1);

            assert!(cart.update_quantity(1, quantity));
            assert_eq!(cart.items(), removed.items());
        }
    }

    #[test]
    fn test_update_quantity_is_absolute() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 250), 4);

        assert!(cart.update_quantity(1, 2));
        assert_eq!(cart.item(1).unwrap().quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 500);
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 250), 1);

        assert!(!cart.update_quantity(99, 3));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_add_negative_quantity_never_leaves_bad_line() {
        let mut cart = Cart::new();
        let product = test_product(1, 100);

        cart.add_item(&product, -1);
        assert!(cart.is_empty());

        cart.add_item(&product, 3);
        cart.add_item(&product, -1);
        assert_eq!(cart.item(1).unwrap().quantity(), 2);

        cart.add_item(&product, -2);
        assert!(cart.item(1).is_none());
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let mut cart = Cart::new();
        let product = test_product(1, 1000);

        cart.add_item(&product, i64::MAX);
        cart.add_item(&product, 1);

        let line = cart.item(1).unwrap();
        assert_eq!(line.quantity(), i64::MAX);
        assert_eq!(line.subtotal().cents(), i64::MAX);

        cart.add_item(&test_product(2, 100), 5);
        assert_eq!(cart.total_items(), i64::MAX);
        assert_eq!(cart.subtotal().cents(), i64::MAX);
    }

    #[test]
    fn test_large_quantity_subtotal_stays_exact() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 1000), 1_000_000_000_000_000);
        assert_eq!(cart.subtotal().cents(), 1_000_000_000_000_000_000);

        // Undiscounted product exceeds i64; the discounted line does not.
        cart.update_quantity(1, 10_000_000_000_000_000);
        cart.set_line_discount(1, DiscountRate::from_percent(50)).unwrap();
        assert_eq!(cart.subtotal().cents(), 5_000_000_000_000_000_000);
    }

    #[test]
    fn test_set_line_discount() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 999), 3);

        cart.set_line_discount(1, DiscountRate::from_percent(15)).unwrap();

        // 29.97 * 0.85 = 25.4745
        assert_eq!(cart.item(1).unwrap().subtotal().cents(), 2547);
        assert_eq!(cart.subtotal().cents(), 2547);
    }

    #[test]
    fn test_set_line_discount_errors() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 999), 1);

        assert!(matches!(
            cart.set_line_discount(1, DiscountRate::from_percent(101)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            cart.set_line_discount(2, DiscountRate::from_percent(5)),
            Err(CoreError::NotInCart(2))
        ));
        assert!(cart.item(1).unwrap().discount().is_zero());
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 999), 2);
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_subtotal_invariant_over_mixed_operations() {
        let mut cart = Cart::new();
        let products: Vec<Product> = (1..=4).map(|id| test_product(id, 137 * id + 3)).collect();

        for (step, product) in products.iter().cycle().take(20).enumerate() {
            let step = step as i64;
            match step % 5 {
                0 | 1 => cart.add_item(product, step % 3 + 1),
                2 => {
                    cart.update_quantity(product.id, step % 4 - 1);
                }
                3 => {
                    let _ = cart.set_line_discount(product.id, DiscountRate::from_bps((step * 613 % 10_000) as u32));
                }
                _ => {
                    cart.remove_item(product.id);
                }
            }
            assert_lines_consistent(&cart);
        }

        let expected: Money = cart.items().iter().map(LineItem::subtotal).sum();
        assert_eq!(cart.subtotal(), expected);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut cart = Cart::new();
        let first = test_product(1, 1000);
        let second = test_product(2, 500);

        cart.add_item(&first, 2);
        assert_eq!((cart.total_items(), cart.subtotal().cents()), (2, 2000));

        cart.add_item(&second, 1);
        assert_eq!((cart.total_items(), cart.subtotal().cents()), (3, 2500));

        cart.update_quantity(1, 5);
        assert_eq!((cart.total_items(), cart.subtotal().cents()), (6, 5500));

        cart.remove_item(2);
        assert_eq!((cart.total_items(), cart.subtotal().cents()), (5, 5000));
    }

    #[test]
    fn test_cart_serializes_for_frontend() {
        let mut cart = Cart::new();
        cart.add_item(&test_product(1, 1000), 2);

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["items"][0]["productId"], 1);
        assert_eq!(json["items"][0]["subtotal"], 2000);
        assert_eq!(json["items"][0]["discount"], 0);
    }
}
