//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Backend prices arrive as decimals ("10.50", 10.5).                     │
//! │  They are converted to integer cents ONCE, at the boundary:             │
//! │                                                                         │
//! │    "10.505" ──► Money::from_decimal ──► 1051 cents (half away from 0)   │
//! │                                                                         │
//! │  From there on every line subtotal and cart total is integer math.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::money::Money;
//! use caja_core::types::DiscountRate;
//!
//! let price = Money::from_cents(1099); // 10.99
//! let line = price.multiply_quantity(3); // 32.97
//! let discounted = line.apply_discount(DiscountRate::from_percent(10));
//! assert_eq!(discounted.cents(), 2967);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::DiscountRate;

/// Basis points in one whole (100%).
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that refunds and discount deltas can be expressed, although the
/// cart itself only ever produces non-negative totals from positive prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a backend decimal into cents, rounding half away from zero.
    ///
    /// Returns `None` when the value does not fit in an `i64` of cents.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_decimal(Decimal::new(10505, 3)).unwrap(); // 10.505
    /// assert_eq!(price.cents(), 1051);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
    }

    /// Returns the value as a two-place decimal (for wire payloads).
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Line subtotal: `self * qty * (1 - rate)`, rounded half away from zero.
    ///
    /// The product is formed in i128 before rounding, so a quantity large
    /// enough to overflow i64 clamps instead of wrapping.
    pub fn extend_discounted(&self, qty: i64, rate: DiscountRate) -> Money {
        let keep_bps = BPS_SCALE - i128::from(rate.bps());
        Money(scale_rounded(i128::from(self.0) * i128::from(qty), keep_bps))
    }

    /// Returns `self * (1 - rate)`, rounded to the nearest cent (half away
    /// from zero).
    ///
    /// ## Line Subtotal Flow
    /// ```text
    /// unit_price 9.99 × quantity 3 ──► 29.97
    ///                                    │
    ///                      apply_discount(15%)
    ///                                    │
    ///                                    ▼
    ///                  29.97 × 0.85 = 25.4745 ──► 25.47
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        let keep_bps = BPS_SCALE - i128::from(rate.bps());
        Money(scale_rounded(i128::from(self.0), keep_bps))
    }

    /// Subtracts `other`, never going below zero.
    ///
    /// Used for the sale total after a coupon discount: a coupon larger than
    /// the cart brings the total to zero, not to a negative charge.
    pub fn saturating_sub_floor_zero(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

/// `amount * bps / 10000` with half-away-from-zero rounding, clamped to i64.
fn scale_rounded(amount: i128, bps: i128) -> i64 {
    let Some(num) = amount.checked_mul(bps) else {
        // Far outside i64 once divided back down.
        return if (amount < 0) == (bps < 0) { i64::MAX } else { i64::MIN };
    };
    let quotient = num / BPS_SCALE;
    let remainder = num % BPS_SCALE;
    let rounded = if remainder.abs() * 2 >= BPS_SCALE {
        quotient + num.signum()
    } else {
        quotient
    };
    rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display. The frontend formats for the shopper's locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
