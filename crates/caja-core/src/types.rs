//! # Domain Types
//!
//! Catalog-facing types the cart consumes.
//!
//! ```text
//! ┌─────────────────┐        ┌─────────────────┐
//! │    Product      │        │  DiscountRate   │
//! │  ─────────────  │        │  ─────────────  │
//! │  id (i64)       │        │  bps (u32)      │
//! │  name           │        │  1000 = 10%     │
//! │  price_cents    │        │  0..=10000      │
//! │  sku?, image?   │        └─────────────────┘
//! └─────────────────┘
//! ```
//!
//! Products are owned by the external catalog. The cart only keeps a
//! snapshot taken when the product was added.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Backend identifier of a product.
pub type ProductId = i64;

// =============================================================================
// Discount Rate
// =============================================================================

/// Percentage discount represented in basis points.
///
/// 1 basis point = 0.01%, so 1000 bps = 10% and 10000 bps = 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a whole percentage (`10` = 10%).
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        DiscountRate(percent * 100)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier.
    pub id: ProductId,

    /// Display name shown on the POS grid and the cart.
    pub name: String,

    /// Price in cents.
    pub price_cents: i64,

    /// Stock keeping unit, when the catalog has one.
    pub sku: Option<String>,

    /// Image URL as published by the catalog. The authenticated image
    /// endpoint is used instead when this is absent.
    pub image_url: Option<String>,
}

impl Product {
    /// Creates a product with only the fields the cart needs.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Product {
            id,
            name: name.into(),
            price_cents: price.cents(),
            sku: None,
            image_url: None,
        }
    }

    /// Returns the price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
