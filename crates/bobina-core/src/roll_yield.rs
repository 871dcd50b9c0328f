//! # Roll Yield
//!
//! How many units one roll produces, and how many rolls an order needs.
//!
//! ## Geometry
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   A bag is one strip cut across the roll:                               │
//! │                                                                         │
//! │      ┌──────────┐  ▲                                                    │
//! │      │  front   │  │ h                                                  │
//! │      ├──────────┤  ▼                                                    │
//! │      │   base   │    base (bottom gusset)                               │
//! │      ├──────────┤  ▲                                                    │
//! │      │   back   │  │ h                                                  │
//! │      ├──────────┤  ▼                                                    │
//! │      │  handle  │    handle (only when included)                        │
//! │      └──────────┘                                                       │
//! │                                                                         │
//! │   effective height = 2h + base + handle                                 │
//! │   units per roll   = floor(roll height / effective height)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::round2;

/// The vertical measures of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitGeometry {
    pub product_height_cm: Decimal,
    pub base_cm: Decimal,
    /// Already zero when the handle is not included.
    pub handle_cm: Decimal,
}

impl UnitGeometry {
    /// `2 × height + base + handle`.
    pub fn effective_height(&self) -> Decimal {
        Decimal::TWO * self.product_height_cm + self.base_cm + self.handle_cm
    }
}

/// Yield of one roll and the material needed for an order.
///
/// Lengths are rounded to two places; counts are exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RollYield {
    #[ts(type = "number")]
    pub roll_height_cm: Decimal,
    #[ts(type = "number")]
    pub effective_unit_height_cm: Decimal,
    pub units_per_roll: i64,
    #[ts(type = "number")]
    pub used_height_cm: Decimal,
    #[ts(type = "number")]
    pub leftover_height_cm: Decimal,
    /// Share of the roll height turned into units, in percent.
    #[ts(type = "number")]
    pub utilization_pct: Decimal,
    /// `None` when a unit does not fit on the roll at all.
    pub rolls_needed: Option<i64>,
    #[ts(type = "number")]
    pub total_height_needed_cm: Decimal,
    pub total_rolls: i64,
    #[ts(type = "number")]
    pub total_leftover_cm: Decimal,
}

/// Computes the yield, or `None` when the roll height or the unit height is
/// missing or not positive.
///
/// ## Example
/// ```rust
/// use bobina_core::roll_yield::{compute_roll_yield, UnitGeometry};
/// use rust_decimal::Decimal;
///
/// let geometry = UnitGeometry {
///     product_height_cm: Decimal::from(10),
///     base_cm: Decimal::ZERO,
///     handle_cm: Decimal::ZERO,
/// };
/// let yield_ = compute_roll_yield(Some(Decimal::from(95)), &geometry, 8).unwrap();
/// assert_eq!(yield_.units_per_roll, 4);
/// assert_eq!(yield_.rolls_needed, Some(2));
/// ```
pub fn compute_roll_yield(
    roll_height_cm: Option<Decimal>,
    geometry: &UnitGeometry,
    quantity: i64,
) -> Option<RollYield> {
    let roll = roll_height_cm.filter(|h| *h > Decimal::ZERO)?;
    if geometry.product_height_cm <= Decimal::ZERO {
        return None;
    }

    let effective = geometry.effective_height();
    if effective <= Decimal::ZERO {
        return None;
    }

    let units = (roll / effective).floor();
    let used = units * effective;
    let leftover = roll - used;
    let utilization = used / roll * Decimal::ONE_HUNDRED;
    let units_per_roll = units.to_i64().unwrap_or(0);

    let rolls_needed = if units_per_roll > 0 {
        Some(div_ceil(quantity, units_per_roll))
    } else {
        None
    };

    let total_height = Decimal::from(quantity) * effective;
    let total_rolls = (total_height / roll).ceil();
    let total_leftover = total_rolls * roll - total_height;

    Some(RollYield {
        roll_height_cm: round2(roll),
        effective_unit_height_cm: round2(effective),
        units_per_roll,
        used_height_cm: round2(used),
        leftover_height_cm: round2(leftover),
        utilization_pct: round2(utilization),
        rolls_needed,
        total_height_needed_cm: round2(total_height),
        total_rolls: total_rolls.to_i64().unwrap_or(0),
        total_leftover_cm: round2(total_leftover),
    })
}

/// Ceiling division for a positive divisor, without overflow near `i64::MAX`.
fn div_ceil(quantity: i64, per_roll: i64) -> i64 {
    if quantity <= 0 {
        0
    } else {
        (quantity - 1) / per_roll + 1
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
