//! # Money Module
//!
//! Integer-cents money for every price in the system.
//!
//! Catalog prices, cart snapshots, frozen order lines and order totals are
//! all `i64` counts of the smallest currency unit wrapped in [`Money`].
//! There is no floating-point constructor on purpose: a float never enters
//! price math, so totals are exact and `Σ(line totals) == order total`
//! holds to the cent.
//!
//! ```rust
//! use bazaar_core::money::Money;
//!
//! let unit_price = Money::from_cents(1099);      // $10.99
//! let line_total = unit_price * 3;               // $32.97
//! let cart_total: Money = [line_total, Money::from_cents(500)]
//!     .into_iter()
//!     .sum();
//! assert_eq!(cart_total.cents(), 3797);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that adjustments and refunds stay representable, even though
/// nothing in the current flows produces a negative amount. The wrapper is
/// `Copy` and serializes as the bare integer, so DTOs and database columns
/// see a plain cents number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Wraps a cents count.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// The raw cents count, for persistence and DTOs.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Log/debug formatting only; locale-aware display belongs to the client.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
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
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

/// Quantity scaling for line totals.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing line totals into a cart or order total.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
