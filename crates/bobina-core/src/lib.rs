//! # bobina-core: Pure Pricing Logic for Bobina
//!
//! This crate is the **heart** of Bobina. It prices nonwoven bags cut from
//! fabric rolls, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bobina Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    pricing-api (axum)                           │   │
//! │  │    POST /api/quotes ──► QuoteService ──► reference lookups      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bobina-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │roll_yield │  │   quote   │  │ validation│  │   │
//! │  │   │  P=c/(1-Σ)│  │ units/roll│  │ assembler │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                bobina-db (Reference Data)                       │   │
//! │  │        materials, fixed taxes, ICMS table, configuration        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MaterialSpec, QuoteRequest, BatchRequest, etc.)
//! - [`money`] - `Money` and `Percent` over exact decimals
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation
//! - [`tax`] - Fixed tax ordering and state tax policy
//! - [`pricing`] - Price solver (cost-plus-markup inversion)
//! - [`roll_yield`] - Units per roll and rolls per order
//! - [`quote`] - Quote assembler (`compute_quote`) and batch merging
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot of inputs = same quote
//! 2. **No I/O**: reference data is handed in by the caller
//! 3. **Full Precision**: compute with `Decimal`, round to cents only at output
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bobina_core::money::{Money, Percent};
//! use bobina_core::pricing::{solve_price, PriceComponents};
//! use rust_decimal::Decimal;
//!
//! let cost = Money::new(Decimal::from(400));
//! let components = PriceComponents {
//!     margin: Percent::new(Decimal::from(10)),
//!     commission: Percent::new(Decimal::from(1)),
//!     other_costs: Percent::new(Decimal::from(2)),
//!     fixed_taxes: Percent::new(Decimal::from(10)),
//!     state_tax: Percent::zero(),
//! };
//!
//! let solved = solve_price(cost, &components);
//! assert_eq!(solved.price.rounded().amount(), Decimal::new(51948, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod roll_yield;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use quote::{compute_quote, QuoteResult, QuoteWarning};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest denominator the price solver will divide by.
///
/// When margin + commission + other costs + taxes reach 100% of the price
/// the equation has no finite solution; the solver clamps `1 − Σp` to this
/// value instead of failing.
pub const MIN_PRICE_DENOMINATOR: rust_decimal::Decimal = rust_decimal::Decimal::from_parts(1, 0, 0, false, 9);

/// Name of the state circulation tax, excluded from the fixed tax list.
pub const STATE_TAX_NAME: &str = "ICMS";
