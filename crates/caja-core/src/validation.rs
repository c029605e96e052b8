//! # Validation Module
//!
//! Input checks for the few operations that are not total.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog payload ──► validate_product() ──► Product                     │
//! │                                                                         │
//! │  Line discount   ──► validate_discount_rate() ──► Cart line            │
//! │                                                                         │
//! │  Quantities, customer, order type, coupon: NOT validated here.          │
//! │  Those setters are total over their input domains.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{DiscountRate, Product};
use crate::MAX_DISCOUNT_PERCENT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a line discount rate.
///
/// ## Rules
/// - Between 0% and 100% inclusive
///
/// ## Example
/// ```rust
/// use caja_core::types::DiscountRate;
/// use caja_core::validation::validate_discount_rate;
///
/// assert!(validate_discount_rate(DiscountRate::from_percent(100)).is_ok());
/// assert!(validate_discount_rate(DiscountRate::from_bps(10_001)).is_err());
/// ```
pub fn validate_discount_rate(rate: DiscountRate) -> ValidationResult<()> {
    if rate.bps() > MAX_DISCOUNT_PERCENT * 100 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: i64::from(MAX_DISCOUNT_PERCENT),
        });
    }

    Ok(())
}

/// Validates a catalog product before it can enter a cart.
///
/// ## Rules
/// - Name must not be blank
/// - Price must not be negative (zero is allowed for free items)
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if product.price_cents < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
