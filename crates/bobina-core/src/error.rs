//! # Error Types
//!
//! Domain-specific error types for bobina-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bobina-core errors (this file)                                        │
//! │  ├── CoreError        - Quote could not be produced                    │
//! │  └── ValidationError  - Request input failures and bounds              │
//! │                                                                         │
//! │  bobina-db errors (separate crate)                                     │
//! │  └── DbError          - Reference data failures                        │
//! │                                                                         │
//! │  pricing-api errors (in app)                                           │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                          DbError ───┴──► ApiError → JSON body           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric degeneracy (percentages summing to 100% or more) is deliberately
//! absent from this hierarchy: the solver clamps and the quote carries a
//! warning instead.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while assembling a quote.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The material reference (id or name) did not resolve.
    ///
    /// ## When This Occurs
    /// - Material id doesn't exist
    /// - Material name was renamed or removed between page load and submit
    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A stored material, tax or configuration value is outside the range
    /// quotes are computed for.
    #[error("Reference data out of range: {0}")]
    InvalidReferenceData(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any arithmetic runs, so a quote is either fully computed or
/// not computed at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must be zero or positive.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unknown state code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value lies outside the accepted bounds.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required { field: field.into() }
    }

    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive { field: field.into() }
    }

    pub fn must_not_be_negative(field: impl Into<String>) -> Self {
        ValidationError::MustNotBeNegative { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>, min: impl fmt::Display, max: impl fmt::Display) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
