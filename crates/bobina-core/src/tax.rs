//! # Tax Rules
//!
//! Fixed tax ordering and the state tax (ICMS) selection policy.
//!
//! ## Which ICMS Rate Applies?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  buyer has IE? ──no──► national table[state]   (0 if unknown/absent)   │
//! │       │                                                                 │
//! │      yes                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StateTaxPolicy::MaterialRate  ──► material.state_tax_rate (or 0)       │
//! │  StateTaxPolicy::Interstate    ──► fixed rate (4%)                      │
//! │                                    unless state == origin, then table   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The policy only decides *where* the rate comes from; looking up the
//! table is the caller's job (see [`StateTaxSource`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Percent;
use crate::types::{MaterialSpec, StateTaxRate, TaxComponent};
use crate::STATE_TAX_NAME;

// =============================================================================
// Fixed Taxes
// =============================================================================

/// Presentation order of the known fixed taxes.
pub const FIXED_TAX_ORDER: [&str; 8] = [
    "PIS",
    "COFINS",
    "ISS",
    "IRPJ",
    "CSLL",
    "INSS Patronal",
    "FGTS",
    "Simples Nacional",
];

/// Whether a tax row is the state tax, which is never a fixed tax.
pub fn is_state_tax(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(STATE_TAX_NAME)
}

/// Position of a tax in [`FIXED_TAX_ORDER`]; unknown names rank last.
fn canonical_rank(name: &str) -> usize {
    FIXED_TAX_ORDER
        .iter()
        .position(|known| known.eq_ignore_ascii_case(name.trim()))
        .unwrap_or(FIXED_TAX_ORDER.len())
}

/// Filters out ICMS and sorts the rest in canonical order.
///
/// Unknown names follow the known ones, alphabetically.
///
/// ## Example
/// ```rust
/// use bobina_core::tax::applicable_fixed_taxes;
/// use bobina_core::{Percent, TaxComponent};
/// use rust_decimal::Decimal;
///
/// let rows = vec![
///     TaxComponent::new("COFINS", Percent::new(Decimal::new(76, 1))),
///     TaxComponent::new("icms", Percent::new(Decimal::from(18))),
///     TaxComponent::new("PIS", Percent::new(Decimal::new(165, 2))),
/// ];
/// let names: Vec<_> = applicable_fixed_taxes(&rows).into_iter().map(|t| t.name).collect();
/// assert_eq!(names, vec!["PIS", "COFINS"]);
/// ```
pub fn applicable_fixed_taxes(taxes: &[TaxComponent]) -> Vec<TaxComponent> {
    let mut applicable: Vec<TaxComponent> = taxes
        .iter()
        .filter(|tax| !is_state_tax(&tax.name))
        .cloned()
        .collect();

    applicable.sort_by(|a, b| {
        canonical_rank(&a.name)
            .cmp(&canonical_rank(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    applicable
}

// =============================================================================
// National ICMS Table
// =============================================================================

/// Internal ICMS rates per state, in tenths of a percent.
const NATIONAL_STATE_RATES: [(&str, i64); 27] = [
    ("AC", 190),
    ("AL", 190),
    ("AM", 200),
    ("AP", 180),
    ("BA", 205),
    ("CE", 200),
    ("DF", 200),
    ("ES", 170),
    ("GO", 190),
    ("MA", 230),
    ("MT", 170),
    ("MS", 170),
    ("MG", 180),
    ("PA", 190),
    ("PB", 200),
    ("PR", 195),
    ("PE", 205),
    ("PI", 225),
    ("RJ", 200),
    ("RN", 200),
    ("RS", 170),
    ("RO", 195),
    ("RR", 200),
    ("SC", 170),
    ("SP", 180),
    ("SE", 190),
    ("TO", 200),
];

/// The national ICMS table used to seed reference data.
pub fn national_state_rates() -> Vec<StateTaxRate> {
    NATIONAL_STATE_RATES
        .iter()
        .map(|(state, tenths)| StateTaxRate {
            state: (*state).to_string(),
            rate: Percent::new(Decimal::new(*tenths, 1)),
        })
        .collect()
}

// =============================================================================
// State Tax Policy
// =============================================================================

/// Where the ICMS rate for a quote comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTaxSource {
    /// Use this rate as-is.
    Fixed(Percent),
    /// Look the state up in the ICMS table (0 when absent).
    Table(String),
}

/// How ICMS is chosen for buyers holding a state registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateTaxPolicy {
    /// The material's own inter-state rate.
    #[default]
    MaterialRate,
    /// A flat inter-state rate, except for sales inside the origin state.
    Interstate { rate: Percent, origin_state: String },
}

impl StateTaxPolicy {
    /// The interstate policy with the usual 4% rate out of São Paulo.
    pub fn interstate_default() -> Self {
        StateTaxPolicy::Interstate {
            rate: Percent::new(Decimal::from(4)),
            origin_state: "SP".to_string(),
        }
    }

    /// Decides where the rate comes from for one request.
    ///
    /// `state` must already be normalized (trimmed, upper-case).
    pub fn resolve_source(
        &self,
        buyer_has_state_registration: bool,
        state: Option<&str>,
        material: &MaterialSpec,
    ) -> StateTaxSource {
        if !buyer_has_state_registration {
            return match state {
                Some(state) => StateTaxSource::Table(state.to_string()),
                None => StateTaxSource::Fixed(Percent::zero()),
            };
        }

        match self {
            StateTaxPolicy::MaterialRate => {
                StateTaxSource::Fixed(material.state_tax_rate.unwrap_or_else(Percent::zero))
            }
            StateTaxPolicy::Interstate { rate, origin_state } => match state {
                Some(state) if state.eq_ignore_ascii_case(origin_state) => {
                    StateTaxSource::Table(state.to_string())
                }
                _ => StateTaxSource::Fixed(*rate),
            },
        }
    }
}

/// Trims and upper-cases a state code; blank becomes `None`.
pub fn normalize_state(state: Option<&str>) -> Option<String> {
    state
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
