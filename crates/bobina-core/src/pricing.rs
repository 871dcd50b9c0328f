//! # Price Solver
//!
//! Finds the sale price at which every percentage charged on the price
//! (margin, commission, other costs, taxes) is covered, plus the cost.
//!
//! ## The Markup Equation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   P = cost + P·m + P·c + P·o + P·t + P·s                                │
//! │                                                                         │
//! │   ⇒  P = cost / (1 − Σp)        Σp = (m + c + o + t + s) / 100          │
//! │                                                                         │
//! │   m margin   c commission   o other costs                               │
//! │   t fixed taxes (sum, ICMS excluded)   s state tax (ICMS)               │
//! │                                                                         │
//! │   Σp ≥ 100% has no finite answer: the denominator is clamped to         │
//! │   MIN_PRICE_DENOMINATOR and the result is flagged `clamped`.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Discounts
//! A discount is taken off the margin, never below zero. The price is solved
//! twice (with the original and the reduced margin) and the difference is
//! reported as the discount value.

use rust_decimal::Decimal;
use tracing::warn;

use crate::money::{Money, Percent};
use crate::MIN_PRICE_DENOMINATOR;

// =============================================================================
// Inputs
// =============================================================================

/// The percentages charged on the final price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceComponents {
    pub margin: Percent,
    pub commission: Percent,
    pub other_costs: Percent,
    /// Sum of the fixed taxes, ICMS excluded.
    pub fixed_taxes: Percent,
    pub state_tax: Percent,
}

impl PriceComponents {
    /// Σp as a percentage.
    pub fn total(&self) -> Percent {
        self.margin + self.commission + self.other_costs + self.fixed_taxes + self.state_tax
    }

    /// Same components with another margin.
    pub fn with_margin(&self, margin: Percent) -> Self {
        PriceComponents { margin, ..*self }
    }
}

// =============================================================================
// Solver
// =============================================================================

/// Output of [`solve_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolvedPrice {
    /// Full-precision price.
    pub price: Money,
    /// The `1 − Σp` actually divided by.
    pub denominator: Decimal,
    /// True when percentages reached 100% and the denominator was clamped.
    pub clamped: bool,
}

/// Solves `P = cost / max(MIN_PRICE_DENOMINATOR, 1 − Σp)`.
///
/// ## Example
/// ```rust
/// use bobina_core::money::{Money, Percent};
/// use bobina_core::pricing::{solve_price, PriceComponents};
/// use rust_decimal::Decimal;
///
/// let components = PriceComponents {
///     margin: Percent::new(Decimal::from(20)),
///     commission: Percent::zero(),
///     other_costs: Percent::zero(),
///     fixed_taxes: Percent::zero(),
///     state_tax: Percent::zero(),
/// };
/// let solved = solve_price(Money::new(Decimal::from(80)), &components);
/// assert_eq!(solved.price.amount(), Decimal::from(100));
/// assert!(!solved.clamped);
/// ```
pub fn solve_price(cost: Money, components: &PriceComponents) -> SolvedPrice {
    let total = components.total();
    let raw = Decimal::ONE - total.fraction();

    let (denominator, clamped) = if raw < MIN_PRICE_DENOMINATOR {
        warn!(
            total_percent = %total,
            "Price percentages reach 100%, clamping denominator"
        );
        (MIN_PRICE_DENOMINATOR, true)
    } else {
        (raw, false)
    };

    SolvedPrice {
        price: Money::new(cost.amount() / denominator),
        denominator,
        clamped,
    }
}

/// Output of [`solve_with_discount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountedPrice {
    /// Price with the original margin.
    pub undiscounted: SolvedPrice,
    /// Price with the margin actually applied.
    pub final_price: SolvedPrice,
    /// Components used for `final_price`.
    pub applied: PriceComponents,
    /// `round(undiscounted) − round(final)`; zero without a discount.
    pub discount_value: Money,
}

/// Solves the price with and without a margin discount.
///
/// `applied_margin = max(0, margin − discount)`. With no discount both
/// solutions are the same and the discount value is zero.
pub fn solve_with_discount(
    cost: Money,
    components: &PriceComponents,
    discount: Option<Percent>,
) -> DiscountedPrice {
    let undiscounted = solve_price(cost, components);

    let discount = match discount {
        Some(d) if !d.is_zero() => d,
        _ => {
            return DiscountedPrice {
                undiscounted,
                final_price: undiscounted,
                applied: *components,
                discount_value: Money::zero(),
            }
        }
    };

    let applied = components.with_margin(components.margin.saturating_sub(discount));
    let final_price = solve_price(cost, &applied);

    DiscountedPrice {
        undiscounted,
        final_price,
        applied,
        discount_value: undiscounted.price.rounded() - final_price.price.rounded(),
    }
}

// =============================================================================
// Decomposition
// =============================================================================

/// The final price split into the value of each component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceDecomposition {
    pub margin: Money,
    pub commission: Money,
    pub other_costs: Money,
    pub fixed_taxes: Money,
    pub state_tax: Money,
}

impl PriceDecomposition {
    /// Sum of every component value.
    pub fn total(&self) -> Money {
        self.margin + self.commission + self.other_costs + self.fixed_taxes + self.state_tax
    }

    /// Rounded cost plus each rounded component value, the sum a reader
    /// gets by adding the displayed lines.
    ///
    /// Within a few cents of the rounded price; equal in the usual case.
    /// Off by far more when the price was clamped.
    pub fn checksum(&self, cost: Money) -> Money {
        cost.rounded()
            + self.margin.rounded()
            + self.commission.rounded()
            + self.other_costs.rounded()
            + self.fixed_taxes.rounded()
            + self.state_tax.rounded()
    }
}

/// Splits a price into `price × fraction` per component, at full precision.
pub fn decompose(price: Money, components: &PriceComponents) -> PriceDecomposition {
    PriceDecomposition {
        margin: components.margin.of(price),
        commission: components.commission.of(price),
        other_costs: components.other_costs.of(price),
        fixed_taxes: components.fixed_taxes.of(price),
        state_tax: components.state_tax.of(price),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn components(margin: Decimal, commission: Decimal, other: Decimal, fixed: Decimal, state: Decimal) -> PriceComponents {
        PriceComponents {
            margin: Percent::new(margin),
            commission: Percent::new(commission),
            other_costs: Percent::new(other),
            fixed_taxes: Percent::new(fixed),
            state_tax: Percent::new(state),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let c = components(dec!(10), dec!(1), dec!(2), dec!(10), dec!(0));
        let solved = solve_price(Money::new(dec!(400)), &c);

        assert_eq!(solved.price.rounded().amount(), dec!(519.48));
        assert_eq!(solved.denominator, dec!(0.77));
        assert!(!solved.clamped);
    }

    #[test]
    fn test_no_percentages_price_equals_cost() {
        let c = components(dec!(0), dec!(0), dec!(0), dec!(0), dec!(0));
        let solved = solve_price(Money::new(dec!(123.45)), &c);
        assert_eq!(solved.price.amount(), dec!(123.45));
    }

    #[test]
    fn test_percentages_at_100_are_clamped() {
        let c = components(dec!(50), dec!(10), dec!(10), dec!(12), dec!(18));
        assert_eq!(c.total().value(), dec!(100));

        let solved = solve_price(Money::new(dec!(1)), &c);
        assert!(solved.clamped);
        assert_eq!(solved.denominator, MIN_PRICE_DENOMINATOR);
        assert_eq!(solved.price.amount(), dec!(1000000000));
    }

    #[test]
    fn test_percentages_above_100_are_clamped() {
        let c = components(dec!(90), dec!(10), dec!(10), dec!(0), dec!(0));
        let solved = solve_price(Money::new(dec!(2)), &c);
        assert!(solved.clamped);
        assert!(solved.price.amount() > Decimal::ZERO);
    }

    #[test]
    fn test_decomposition_sums_back_to_price() {
        let c = components(dec!(10), dec!(1), dec!(2), dec!(10), dec!(0));
        let cost = Money::new(dec!(400));
        let solved = solve_price(cost, &c);
        let parts = decompose(solved.price, &c);

        assert_eq!(parts.margin.rounded().amount(), dec!(51.95));
        assert_eq!(parts.commission.rounded().amount(), dec!(5.19));
        assert_eq!(parts.other_costs.rounded().amount(), dec!(10.39));
        assert_eq!(parts.fixed_taxes.rounded().amount(), dec!(51.95));
        assert!(parts.state_tax.is_zero());
        assert_eq!(parts.checksum(cost), solved.price.rounded());
    }

    #[test]
    fn test_checksum_adds_displayed_values() {
        // 100 / 0.97 = 103.0927...; each 1% part is 1.0309... and shows 1.03
        let c = components(dec!(1), dec!(1), dec!(1), dec!(0), dec!(0));
        let cost = Money::new(dec!(100));
        let solved = solve_price(cost, &c);
        let parts = decompose(solved.price, &c);

        assert_eq!(solved.price.rounded().amount(), dec!(103.09));
        assert_eq!(parts.checksum(cost).amount(), dec!(103.09));

        // 100 / 0.95 = 105.2631...; five parts of 1.0526... each show 1.05
        let c = components(dec!(1), dec!(1), dec!(1), dec!(1), dec!(1));
        let solved = solve_price(cost, &c);
        let parts = decompose(solved.price, &c);

        assert_eq!(solved.price.rounded().amount(), dec!(105.26));
        assert_eq!(parts.checksum(cost).amount(), dec!(105.25));
    }

    #[test]
    fn test_discount_reduces_margin() {
        let c = components(dec!(10), dec!(1), dec!(2), dec!(10), dec!(0));
        let cost = Money::new(dec!(400));
        let result = solve_with_discount(cost, &c, Some(Percent::new(dec!(4))));

        assert_eq!(result.applied.margin.value(), dec!(6));
        assert!(result.final_price.price < result.undiscounted.price);
        assert_eq!(
            result.discount_value,
            result.undiscounted.price.rounded() - result.final_price.price.rounded()
        );
        // 400 / 0.81
        assert_eq!(result.final_price.price.rounded().amount(), dec!(493.83));
        assert_eq!(result.discount_value.amount(), dec!(25.65));
    }

    #[test]
    fn test_discount_larger_than_margin_floors_at_zero() {
        let c = components(dec!(5), dec!(0), dec!(0), dec!(0), dec!(0));
        let result = solve_with_discount(Money::new(dec!(100)), &c, Some(Percent::new(dec!(8))));

        assert!(result.applied.margin.is_zero());
        assert_eq!(result.final_price.price.amount(), dec!(100));
    }

    #[test]
    fn test_zero_discount_is_no_discount() {
        let c = components(dec!(10), dec!(0), dec!(0), dec!(0), dec!(0));
        let cost = Money::new(dec!(90));

        for discount in [None, Some(Percent::zero())] {
            let result = solve_with_discount(cost, &c, discount);
            assert_eq!(result.final_price, result.undiscounted);
            assert!(result.discount_value.is_zero());
            assert_eq!(result.applied, c);
        }
    }
}
