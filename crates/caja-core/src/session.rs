//! # Sale Session
//!
//! One in-progress sale: the cart plus its sale context.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleSession                                                            │
//! │  ├── id            UUID v4, new for every sale                          │
//! │  ├── cart          Cart (line items)                                    │
//! │  └── context       SaleContext (customer, order type, coupon)           │
//! │                                                                         │
//! │  Screens get `&SaleSession` / `&mut SaleSession` passed in. There is    │
//! │  no global: code that has no session cannot touch a cart.               │
//! │                                                                         │
//! │  checkout ──► complete() ──► SaleSummary (handed to payment flow)       │
//! │                    │                                                    │
//! │                    └──► reset(): empty cart, default context, new id    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartTotals, LineItem};
use crate::money::Money;
use crate::sale::SaleContext;

/// The sale currently being rung up.
#[derive(Debug, Clone)]
pub struct SaleSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    cart: Cart,
    context: SaleContext,
}

impl SaleSession {
    pub fn new() -> Self {
        SaleSession {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            cart: Cart::new(),
            context: SaleContext::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn context(&self) -> &SaleContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SaleContext {
        &mut self.context
    }

    /// Amount due: cart subtotal minus the coupon discount, never negative.
    pub fn total(&self) -> Money {
        self.cart
            .subtotal()
            .saturating_sub_floor_zero(self.context.discount())
    }

    /// Starts a new sale: empty cart, default context, fresh id.
    pub fn reset(&mut self) {
        self.cart.clear();
        self.context.reset_sale_data();
        self.id = Uuid::new_v4();
        self.started_at = Utc::now();
    }

    /// Snapshot of the sale for the checkout screen.
    pub fn summary(&self) -> SaleSummary {
        SaleSummary {
            session_id: self.id,
            started_at: self.started_at,
            lines: self.cart.items().to_vec(),
            totals: self.cart.totals(),
            sale: self.context.clone(),
            total: self.total(),
        }
    }

    /// Hands the finished sale to checkout and starts the next one.
    pub fn complete(&mut self) -> SaleSummary {
        let summary = self.summary();
        self.reset();
        summary
    }
}

impl Default for SaleSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the checkout/payment flow needs to submit a sale.
///
/// ## Serialization
/// ```json
/// {
///   "sessionId": "6f1c…",
///   "startedAt": "2026-10-19T12:00:00Z",
///   "lines": [ { "productId": 1, "quantity": 5, "subtotal": 5000, … } ],
///   "totals": { "lineCount": 1, "totalItems": 5, "subtotal": 5000 },
///   "customer": "Consumidor Final",
///   "customerId": 1,
///   "orderType": "",
///   "saleName": "",
///   "discount": 1000,
///   "couponId": 7,
///   "couponCode": "SAVE10",
///   "total": 4000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    #[ts(as = "String")]
    pub session_id: Uuid,
    #[ts(as = "String")]
    pub started_at: DateTime<Utc>,
    pub lines: Vec<LineItem>,
    pub totals: CartTotals,
    #[serde(flatten)]
    pub sale: SaleContext,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
