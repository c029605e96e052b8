//! # Session Commands
//!
//! The operations screens invoke on the shared sale session.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│ Next     │       │
//! │  │  Sale    │     │          │     │ Summary  │     │ Sale     │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       complete_sale                      │
//! │                   update_cart_item  (summary + reset)                  │
//! │                   set_line_discount                                     │
//! │                   apply_coupon                                          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command takes the [`SessionState`] explicitly and holds the lock
//! only for the duration of the mutation.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use caja_core::validation::{validate_discount_rate, validate_product};
use caja_core::{
    CartTotals, CoreError, DiscountRate, LineItem, Money, Product, ProductId, SaleContext,
    SaleSession, SaleSummary, ValidationError,
};

use crate::error::{ClientError, ClientResult};
use crate::state::SessionState;

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
    /// Subtotal minus the sale discount.
    pub total: Money,
}

impl From<&SaleSession> for CartResponse {
    fn from(session: &SaleSession) -> Self {
        CartResponse {
            items: session.cart().items().to_vec(),
            totals: session.cart().totals(),
            total: session.total(),
        }
    }
}

// =============================================================================
// Cart Commands
// =============================================================================

/// Gets the current cart contents.
pub fn get_cart(state: &SessionState) -> CartResponse {
    debug!("get_cart command");
    state.with_session(|s| CartResponse::from(s))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - Already in cart: quantity is added to the line
/// - Not in cart: new line at the product's current price
/// - Quantity defaults to 1
pub fn add_to_cart(
    state: &SessionState,
    product: &Product,
    quantity: Option<i64>,
) -> ClientResult<CartResponse> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = product.id, quantity, "add_to_cart command");

    validate_product(product).map_err(CoreError::from)?;

    Ok(state.with_session_mut(|s| {
        s.cart_mut().add_item(product, quantity);
        CartResponse::from(&*s)
    }))
}

/// Sets the quantity of a line; zero or less removes it.
///
/// Unknown products leave the cart unchanged.
pub fn update_cart_item(state: &SessionState, product_id: ProductId, quantity: i64) -> CartResponse {
    debug!(product_id, quantity, "update_cart_item command");

    state.with_session_mut(|s| {
        if !s.cart_mut().update_quantity(product_id, quantity) {
            debug!(product_id, "update_cart_item: product not in cart");
        }
        CartResponse::from(&*s)
    })
}

/// Removes a line from the cart.
pub fn remove_from_cart(state: &SessionState, product_id: ProductId) -> CartResponse {
    debug!(product_id, "remove_from_cart command");

    state.with_session_mut(|s| {
        s.cart_mut().remove_item(product_id);
        CartResponse::from(&*s)
    })
}

/// Clears all lines. Sale metadata is kept.
pub fn clear_cart(state: &SessionState) -> CartResponse {
    debug!("clear_cart command");

    state.with_session_mut(|s| {
        s.cart_mut().clear();
        CartResponse::from(&*s)
    })
}

/// Applies a percentage discount (0-100) to one line.
pub fn set_line_discount(
    state: &SessionState,
    product_id: ProductId,
    percent: u32,
) -> ClientResult<CartResponse> {
    debug!(product_id, percent, "set_line_discount command");

    let rate = DiscountRate::from_percent(percent);
    validate_discount_rate(rate).map_err(CoreError::from)?;

    state.with_session_mut(|s| {
        s.cart_mut().set_line_discount(product_id, rate)?;
        Ok::<_, ClientError>(CartResponse::from(&*s))
    })
}

// =============================================================================
// Sale Context Commands
// =============================================================================

pub fn set_customer(state: &SessionState, name: &str, customer_id: i64) -> SaleContext {
    debug!(customer_id, "set_customer command");
    state.with_session_mut(|s| {
        s.context_mut().set_customer(name, customer_id);
        s.context().clone()
    })
}

pub fn set_order_type(state: &SessionState, order_type: &str) -> SaleContext {
    debug!(order_type, "set_order_type command");
    state.with_session_mut(|s| {
        s.context_mut().set_order_type(order_type);
        s.context().clone()
    })
}

pub fn set_sale_name(state: &SessionState, name: &str) -> SaleContext {
    debug!("set_sale_name command");
    state.with_session_mut(|s| {
        s.context_mut().set_sale_name(name);
        s.context().clone()
    })
}

/// Records a coupon's sale-level discount.
///
/// The amount comes from the backend as a decimal and is stored in cents.
pub fn apply_coupon(
    state: &SessionState,
    amount: Decimal,
    coupon_id: Option<i64>,
    code: &str,
) -> ClientResult<SaleContext> {
    debug!(%amount, ?coupon_id, code, "apply_coupon command");

    let discount = Money::from_decimal(amount)
        .ok_or_else(|| ClientError::InvalidPayload(format!("discount out of range: {}", amount)))?;
    if discount.is_negative() {
        return Err(CoreError::from(ValidationError::Negative {
            field: "discount".to_string(),
        })
        .into());
    }

    Ok(state.with_session_mut(|s| {
        s.context_mut().set_discount(discount, coupon_id, code);
        s.context().clone()
    }))
}

pub fn clear_coupon(state: &SessionState) -> SaleContext {
    debug!("clear_coupon command");
    state.with_session_mut(|s| {
        s.context_mut().clear_discount();
        s.context().clone()
    })
}

// =============================================================================
// Checkout
// =============================================================================

/// Snapshot of the sale for the checkout screen.
pub fn get_summary(state: &SessionState) -> SaleSummary {
    debug!("get_summary command");
    state.with_session(SaleSession::summary)
}

/// Hands the sale to checkout and starts a new one.
pub fn complete_sale(state: &SessionState) -> SaleSummary {
    let summary = state.with_session_mut(SaleSession::complete);
    info!(
        session_id = %summary.session_id,
        lines = summary.lines.len(),
        total = %summary.total,
        "Sale handed to checkout"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: ProductId, cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_cents(cents))
    }

    #[test]
    fn test_cart_flow() {
        let state = SessionState::new();

        add_to_cart(&state, &product(1, 1000), Some(2)).unwrap();
        let cart = add_to_cart(&state, &product(1, 1000), None).unwrap();
        assert_eq!(cart.totals.total_items, 3);

        let cart = add_to_cart(&state, &product(2, 1500), Some(2)).unwrap();
        assert_eq!(cart.totals.subtotal.cents(), 6000);

        let cart = update_cart_item(&state, 2, 1);
        assert_eq!(cart.totals.subtotal.cents(), 4500);

        let cart = remove_from_cart(&state, 1);
        assert_eq!(cart.items.len(), 1);

        let cart = clear_cart(&state);
        assert!(cart.items.is_empty());
        assert_eq!(get_cart(&state).totals.line_count, 0);
    }

    #[test]
    fn test_add_invalid_product_rejected() {
        let state = SessionState::new();
        let result = add_to_cart(&state, &product(1, -5), None);

        assert!(matches!(result, Err(ClientError::Core(CoreError::Validation(_)))));
        assert!(get_cart(&state).items.is_empty());
    }

    #[test]
    fn test_update_unknown_product_is_noop() {
        let state = SessionState::new();
        add_to_cart(&state, &product(1, 1000), None).unwrap();

        let cart = update_cart_item(&state, 99, 4);
        assert_eq!(cart.totals.total_items, 1);
    }

    #[test]
    fn test_line_discount() {
        let state = SessionState::new();
        add_to_cart(&state, &product(1, 1000), Some(2)).unwrap();

        let cart = set_line_discount(&state, 1, 10).unwrap();
        assert_eq!(cart.totals.subtotal.cents(), 1800);

        assert!(matches!(
            set_line_discount(&state, 1, 150),
            Err(ClientError::Core(CoreError::Validation(_)))
        ));
        assert!(matches!(
            set_line_discount(&state, 42, 10),
            Err(ClientError::Core(CoreError::NotInCart(42)))
        ));
    }

    #[test]
    fn test_coupon_reduces_total() {
        let state = SessionState::new();
        add_to_cart(&state, &product(1, 5000), None).unwrap();

        let context = apply_coupon(&state, Decimal::new(1000, 2), Some(7), "SAVE10").unwrap();
        assert_eq!(context.discount().cents(), 1000);
        assert_eq!(get_cart(&state).total.cents(), 4000);

        assert!(apply_coupon(&state, Decimal::new(-100, 2), None, "BAD").is_err());
        assert_eq!(get_summary(&state).sale.coupon_code(), "SAVE10");

        clear_coupon(&state);
        assert_eq!(get_cart(&state).total.cents(), 5000);
    }

    #[test]
    fn test_context_setters() {
        let state = SessionState::new();
        set_customer(&state, "Ana Pérez", 42);
        set_order_type(&state, "delivery");
        let context = set_sale_name(&state, "Mesa 4");

        assert_eq!(context.customer(), "Ana Pérez");
        assert_eq!(context.customer_id(), 42);
        assert_eq!(context.order_type(), "delivery");
        assert_eq!(context.sale_name(), "Mesa 4");
    }

    #[test]
    fn test_complete_sale_starts_next() {
        let state = SessionState::new();
        add_to_cart(&state, &product(1, 1000), Some(5)).unwrap();
        set_customer(&state, "Ana Pérez", 42);

        let summary = complete_sale(&state);
        assert_eq!(summary.total.cents(), 5000);
        assert_eq!(summary.sale.customer_id(), 42);

        let next = get_summary(&state);
        assert_ne!(next.session_id, summary.session_id);
        assert!(next.lines.is_empty());
        assert_eq!(next.sale.customer_id(), caja_core::DEFAULT_CUSTOMER_ID);
    }
}
