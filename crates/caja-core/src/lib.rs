//! # caja-core: Pure Sale Session Logic for Caja POS
//!
//! This crate holds the state of one in-progress sale: the cart of line
//! items and the sale-level metadata (customer, order type, coupon discount).
//! Everything here is synchronous, in-memory and free of I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Frontend (screens)                    │   │
//! │  │    POS grid ──► Cart panel ──► Checkout ──► Receipt             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   money   │  │   cart    │  │   sale    │  │  session  │   │   │
//! │  │   │   Money   │  │   Cart    │  │SaleContext│  │SaleSession│   │   │
//! │  │   │ Discount  │  │ LineItem  │  │  Coupon   │  │  Summary  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                caja-client (HTTP edge)                          │   │
//! │  │        product images, config, token store, shared state        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product snapshot and discount rate
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart and line items
//! - [`sale`] - Sale-level metadata
//! - [`session`] - Sale session owning cart + metadata, checkout summary
//! - [`validation`] - Input checks for the few validated setters
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::{Money, Product, SaleSession};
//!
//! let mut session = SaleSession::new();
//! let soda = Product::new(1, "Soda", Money::from_cents(1000));
//!
//! session.cart_mut().add_item(&soda, 2);
//! assert_eq!(session.cart().total_items(), 2);
//! assert_eq!(session.cart().subtotal().cents(), 2000);
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod sale;
pub mod session;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartTotals, LineItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use sale::{CouponDiscount, SaleContext};
pub use session::{SaleSession, SaleSummary};
pub use types::{DiscountRate, Product, ProductId};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customer name used when the cashier has not picked anyone.
pub const DEFAULT_CUSTOMER_NAME: &str = "Consumidor Final";

/// Backend id of the walk-in customer record.
pub const DEFAULT_CUSTOMER_ID: i64 = 1;

/// Upper bound of a line discount, in percent.
pub const MAX_DISCOUNT_PERCENT: u32 = 100;
