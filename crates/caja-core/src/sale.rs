//! # Sale Context
//!
//! Sale-level metadata that is not tied to any cart line.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field group          Set together by        Default                   │
//! │  ───────────          ───────────────        ───────                   │
//! │  customer + id        set_customer           "Consumidor Final", 1     │
//! │  order_type           set_order_type         ""                        │
//! │  sale_name            set_sale_name          ""                        │
//! │  discount + coupon    set_discount /         0, None, ""               │
//! │    id + coupon code     clear_discount                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fields are private so a customer name can never be changed without its
//! id, and a discount never without its coupon identity.

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::{DEFAULT_CUSTOMER_ID, DEFAULT_CUSTOMER_NAME};

/// Sale-level discount and the coupon that granted it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CouponDiscount {
    /// Amount taken off the cart subtotal.
    pub discount: Money,
    /// Backend coupon id. May be absent while a code is still recorded.
    pub coupon_id: Option<i64>,
    pub coupon_code: String,
}

/// Metadata of the sale being rung up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleContext {
    customer: String,
    customer_id: i64,
    order_type: String,
    sale_name: String,
    #[serde(flatten)]
    coupon: CouponDiscount,
}

impl SaleContext {
    pub fn new() -> Self {
        SaleContext {
            customer: DEFAULT_CUSTOMER_NAME.to_string(),
            customer_id: DEFAULT_CUSTOMER_ID,
            order_type: String::new(),
            sale_name: String::new(),
            coupon: CouponDiscount::default(),
        }
    }

    /// Replaces the customer name and id as one unit.
    pub fn set_customer(&mut self, name: impl Into<String>, id: i64) {
        self.customer = name.into();
        self.customer_id = id;
    }

    pub fn set_order_type(&mut self, order_type: impl Into<String>) {
        self.order_type = order_type.into();
    }

    pub fn set_sale_name(&mut self, name: impl Into<String>) {
        self.sale_name = name.into();
    }

    /// Applies a sale-level discount together with its coupon identity.
    pub fn set_discount(&mut self, amount: Money, coupon_id: Option<i64>, code: impl Into<String>) {
        self.coupon = CouponDiscount {
            discount: amount,
            coupon_id,
            coupon_code: code.into(),
        };
    }

    /// Inverse of [`SaleContext::set_discount`].
    pub fn clear_discount(&mut self) {
        self.coupon = CouponDiscount::default();
    }

    /// Restores every field to its default, for the next sale.
    pub fn reset_sale_data(&mut self) {
        *self = SaleContext::new();
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    pub fn order_type(&self) -> &str {
        &self.order_type
    }

    pub fn sale_name(&self) -> &str {
        &self.sale_name
    }

    pub fn discount(&self) -> Money {
        self.coupon.discount
    }

    pub fn coupon_id(&self) -> Option<i64> {
        self.coupon.coupon_id
    }

    pub fn coupon_code(&self) -> &str {
        &self.coupon.coupon_code
    }

    pub fn coupon(&self) -> &CouponDiscount {
        &self.coupon
    }

    /// True when a coupon discount is applied.
    pub fn has_discount(&self) -> bool {
        self.coupon != CouponDiscount::default()
    }
}

impl Default for SaleContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
