//! # Money Module
//!
//! Provides the `Money` and `Percent` types for pricing arithmetic.
//!
//! ## Why Decimal, Not Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FRACTIONAL COST PROBLEM                                            │
//! │                                                                         │
//! │  Fabric is priced per cm of width: R$ 0.0137/cm is a normal figure.    │
//! │  A 38 cm bag costs R$ 0.5206, and only the order total is a            │
//! │  presentable amount.                                                    │
//! │                                                                         │
//! │  Integer cents would round every per-unit figure before it is          │
//! │  multiplied by thousands of units → visible drift on the total.        │
//! │                                                                         │
//! │  OUR SOLUTION: exact decimals, rounded once                             │
//! │    compute ──► full precision (28 significant digits)                   │
//! │    output  ──► round to 2 places, half away from zero                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bobina_core::money::{Money, Percent};
//! use rust_decimal::Decimal;
//!
//! let price = Money::new(Decimal::new(51948, 2)); // R$ 519.48
//! let margin = Percent::new(Decimal::from(10));   // 10%
//!
//! assert_eq!(margin.of(price).rounded().amount(), Decimal::new(5195, 2));
//! assert_eq!(price.to_string(), "R$ 519,48");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

/// Decimal places kept when a value leaves the core.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Rounds a decimal to `CURRENCY_DECIMALS`, half away from zero.
///
/// Used for every figure that is displayed: currency, heights, percentages.
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Money Type
// =============================================================================

/// A currency amount (BRL) kept at full precision.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  MaterialSpec.cost_per_cm × width ──► unit cost ──► batch cost          │
/// │                                                          │              │
/// │                                    solve_price ◄─────────┘              │
/// │                                         │                               │
/// │                              final price ──► Percent::of ──► breakdown  │
/// │                                                                         │
/// │  Only `rounded()` values are placed in a QuoteResult                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Creates a Money value from a decimal amount in reais.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to cents (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use bobina_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let raw = Money::new(Decimal::new(519_480_519, 6)); // 519.480519
    /// assert_eq!(raw.rounded().amount(), Decimal::new(51948, 2));
    ///
    /// let half = Money::new(Decimal::new(1005, 3)); // 1.005
    /// assert_eq!(half.rounded().amount(), Decimal::new(101, 2));
    /// ```
    #[inline]
    pub fn rounded(&self) -> Money {
        Money(round2(self.0))
    }

    /// Multiplies by a plain factor (width, height ratio, tax multiplier).
    #[inline]
    pub fn times(&self, factor: Decimal) -> Money {
        Money(self.0 * factor)
    }

    /// Multiplies money by a unit count.
    ///
    /// ## Example
    /// ```rust
    /// use bobina_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let unit = Money::new(Decimal::new(4, 1)); // R$ 0.40
    /// assert_eq!(unit.multiply_quantity(1000).amount(), Decimal::from(400));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Money {
        Money(self.0 * Decimal::from(qty))
    }

    /// Divides by a unit count, returning zero for a zero count.
    pub fn per_unit(&self, qty: i64) -> Money {
        if qty == 0 {
            return Money::zero();
        }
        Money(self.0 / Decimal::from(qty))
    }
}

/// Display in the pt-BR convention used on quotes: `R$ 12.345,67`.
///
/// ## Note
/// Always shows the rounded value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = round2(self.0);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        let plain = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{}", sign, grouped, frac_part)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage as entered by the user: `10` means 10%.
///
/// Replaces basis points because rates such as ICMS 20.5% or a 2.75%
/// commission are entered with arbitrary decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(#[ts(type = "number")] Decimal);

impl Percent {
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Returns the percentage value (10 for 10%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the value as a fraction (0.10 for 10%).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Applies this percentage to an amount.
    #[inline]
    pub fn of(&self, amount: Money) -> Money {
        amount.times(self.fraction())
    }

    /// Subtracts another percentage, floored at zero.
    ///
    /// ## Example
    /// ```rust
    /// use bobina_core::money::Percent;
    /// use rust_decimal::Decimal;
    ///
    /// let margin = Percent::new(Decimal::from(10));
    /// assert_eq!(margin.saturating_sub(Percent::new(Decimal::from(4))).value(), Decimal::from(6));
    /// assert!(margin.saturating_sub(Percent::new(Decimal::from(15))).is_zero());
    /// ```
    pub fn saturating_sub(&self, other: Percent) -> Percent {
        Percent((self.0 - other.0).max(Decimal::ZERO))
    }

    /// Rounds the percentage for display.
    #[inline]
    pub fn rounded(&self) -> Percent {
        Percent(round2(self.0))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", round2(self.0).normalize())
    }
}

impl Add for Percent {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Percent(self.0 + other.0)
    }
}

impl Sum for Percent {
    fn sum<I: Iterator<Item = Percent>>(iter: I) -> Self {
        iter.fold(Percent::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
