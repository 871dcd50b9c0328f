//! # Validation Module
//!
//! Request validation for quotes.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Mandatory fields (height, material reference)                     │
//! │  ├── Positive quantity                                                  │
//! │  ├── Non-negative dimensions and percentages                           │
//! │  ├── Upper bounds on counts, measures, prices and percentages          │
//! │  └── State code format                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Reference lookup (bobina-db)                                 │
//! │  └── Material must exist                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bobina_core::validation::{validate_quantity, validate_state_code};
//!
//! validate_quantity(500).unwrap();
//! assert!(validate_quantity(0).is_err());
//!
//! assert_eq!(validate_state_code(" mg ").unwrap(), "MG");
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::{Money, Percent};
use crate::types::{Configuration, MaterialSpec, QuoteRequest, TaxComponent};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Bounds
// =============================================================================
//
// Within these bounds every intermediate value of a quote, including a
// clamped price, stays far below `Decimal::MAX` and `i64::MAX`.

/// Largest order quantity, and largest calibration loss.
pub const MAX_QUANTITY: i64 = 10_000_000;

/// Largest single measure (width, height, gusset, handle, roll height).
pub const MAX_DIMENSION_CM: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Smallest product height.
pub const MIN_HEIGHT_CM: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest single percentage.
pub const MAX_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Largest unit price (cost per cm, silk, service).
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be greater than zero
/// - At most `MAX_QUANTITY`
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::out_of_range("quantity", 1, MAX_QUANTITY));
    }
    Ok(())
}

/// Validates a calibration loss count. Negative counts are read as zero.
pub fn validate_loss_units(field: &str, units: i64) -> ValidationResult<()> {
    if units > MAX_QUANTITY {
        return Err(ValidationError::out_of_range(field, 0, MAX_QUANTITY));
    }
    Ok(())
}

/// Validates a dimension that may be zero (width, gussets, handle).
pub fn validate_dimension(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::must_not_be_negative(field));
    }
    if value > MAX_DIMENSION_CM {
        return Err(ValidationError::out_of_range(field, 0, MAX_DIMENSION_CM));
    }
    Ok(())
}

/// Validates the product height, which is mandatory and strictly positive.
///
/// ## Example
/// ```rust
/// use bobina_core::validation::validate_height;
/// use rust_decimal::Decimal;
///
/// assert!(validate_height(Some(Decimal::from(10))).is_ok());
/// assert!(validate_height(None).is_err());
/// assert!(validate_height(Some(Decimal::ZERO)).is_err());
/// ```
pub fn validate_height(height_cm: Option<Decimal>) -> ValidationResult<Decimal> {
    let height = height_cm.ok_or_else(|| ValidationError::required("height_cm"))?;

    if height <= Decimal::ZERO {
        return Err(ValidationError::must_be_positive("height_cm"));
    }
    if height < MIN_HEIGHT_CM || height > MAX_DIMENSION_CM {
        return Err(ValidationError::out_of_range("height_cm", MIN_HEIGHT_CM, MAX_DIMENSION_CM));
    }

    Ok(height)
}

/// Validates a user-entered percentage.
pub fn validate_percent(field: &str, value: Percent) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::must_not_be_negative(field));
    }
    if value.value() > MAX_PERCENT {
        return Err(ValidationError::out_of_range(field, 0, MAX_PERCENT));
    }
    Ok(())
}

/// Validates a unit price.
pub fn validate_price(field: &str, value: Money) -> ValidationResult<()> {
    if value.is_negative() {
        return Err(ValidationError::must_not_be_negative(field));
    }
    if value.amount() > MAX_UNIT_PRICE {
        return Err(ValidationError::out_of_range(field, 0, MAX_UNIT_PRICE));
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Normalizes and validates a state code (UF).
///
/// ## Rules
/// - Trimmed and upper-cased
/// - Exactly two ASCII letters
pub fn validate_state_code(state: &str) -> ValidationResult<String> {
    let code = state.trim().to_ascii_uppercase();

    if code.is_empty() {
        return Err(ValidationError::required("state"));
    }

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "state".to_string(),
            reason: "must be a two-letter state code".to_string(),
        });
    }

    Ok(code)
}

// =============================================================================
// Request Validator
// =============================================================================

/// Validates every user-supplied field of a quote request.
///
/// Absent optional fields are not checked here; their configured defaults
/// are trusted. Blank state strings count as absent.
pub fn validate_request(request: &QuoteRequest) -> ValidationResult<()> {
    validate_height(request.height_cm)?;
    validate_quantity(request.quantity)?;
    validate_dimension("width_cm", request.width_cm)?;

    if let Some(side_fold) = request.side_fold_cm {
        validate_dimension("side_fold_cm", side_fold)?;
    }
    if let Some(base) = request.base_cm {
        validate_dimension("base_cm", base)?;
    }
    if let Some(handle) = request.handle_size_cm {
        validate_dimension("handle_size_cm", handle)?;
    }
    if let Some(losses) = request.calibration_loss_units {
        validate_loss_units("calibration_loss_units", losses)?;
    }

    if let Some(margin) = request.margin {
        validate_percent("margin", margin)?;
    }
    validate_percent("commission", request.commission)?;
    if let Some(other) = request.other_costs {
        validate_percent("other_costs", other)?;
    }
    if let Some(discount) = request.discount {
        validate_percent("discount", discount)?;
    }

    if let Some(state) = request.state.as_deref() {
        if !state.trim().is_empty() {
            validate_state_code(state)?;
        }
    }

    if let Some(silk) = request.silk_unit_price {
        validate_price("silk_unit_price", silk)?;
    }

    for service in &request.services {
        if service.name.trim().is_empty() {
            return Err(ValidationError::required("services.name"));
        }
        validate_price("services.unit_price", service.unit_price)?;
        validate_percent("services.tax_rate", service.tax_rate)?;
    }

    Ok(())
}

// =============================================================================
// Reference Validator
// =============================================================================

/// Checks stored reference values against the same bounds as requests.
///
/// A non-positive roll height is allowed; it disables the yield block.
pub fn validate_reference(
    material: &MaterialSpec,
    fixed_taxes: &[TaxComponent],
    state_tax_rate: Percent,
    configuration: &Configuration,
) -> ValidationResult<()> {
    validate_price("material.cost_per_cm", material.cost_per_cm)?;
    if let Some(roll) = material.roll_height_cm {
        if roll > MAX_DIMENSION_CM {
            return Err(ValidationError::out_of_range(
                "material.roll_height_cm",
                0,
                MAX_DIMENSION_CM,
            ));
        }
    }

    for tax in fixed_taxes {
        validate_percent(&format!("fixed_taxes.{}", tax.name), tax.rate)?;
    }
    validate_percent("state_tax_rate", state_tax_rate)?;

    validate_percent("configuration.margin", configuration.margin)?;
    validate_percent("configuration.other_costs", configuration.other_costs)?;
    validate_loss_units(
        "configuration.calibration_loss_units",
        configuration.calibration_loss_units,
    )?;
    validate_price("configuration.service_unit_price", configuration.service_unit_price)?;
    validate_dimension("configuration.handle_size_cm", configuration.handle_size_cm)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServiceLineItem;
    use rust_decimal_macros::dec;

    fn valid_request() -> QuoteRequest {
        QuoteRequest {
            material_id: Some(1),
            width_cm: dec!(40),
            height_cm: Some(dec!(10)),
            quantity: 1000,
            ..QuoteRequest::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_missing_height() {
        let request = QuoteRequest {
            height_cm: None,
            ..valid_request()
        };
        assert_eq!(
            validate_request(&request),
            Err(ValidationError::required("height_cm"))
        );
    }

    #[test]
    fn test_non_positive_height() {
        let request = QuoteRequest {
            height_cm: Some(dec!(-1)),
            ..valid_request()
        };
        assert_eq!(
            validate_request(&request),
            Err(ValidationError::must_be_positive("height_cm"))
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        for quantity in [0, -5] {
            let request = QuoteRequest {
                quantity,
                ..valid_request()
            };
            assert_eq!(
                validate_request(&request),
                Err(ValidationError::must_be_positive("quantity"))
            );
        }
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let request = QuoteRequest {
            side_fold_cm: Some(dec!(-2)),
            ..valid_request()
        };
        assert_eq!(
            validate_request(&request),
            Err(ValidationError::must_not_be_negative("side_fold_cm"))
        );

        let request = QuoteRequest {
            width_cm: dec!(-0.5),
            ..valid_request()
        };
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn test_zero_width_allowed() {
        let request = QuoteRequest {
            width_cm: Decimal::ZERO,
            ..valid_request()
        };
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn test_negative_percentages_rejected() {
        let request = QuoteRequest {
            commission: Percent::new(dec!(-1)),
            ..valid_request()
        };
        assert_eq!(
            validate_request(&request),
            Err(ValidationError::must_not_be_negative("commission"))
        );
    }

    #[test]
    fn test_upper_bounds() {
        let cases = [
            (
                QuoteRequest {
                    quantity: i64::MAX,
                    ..valid_request()
                },
                "quantity",
            ),
            (
                QuoteRequest {
                    calibration_loss_units: Some(i64::MAX),
                    ..valid_request()
                },
                "calibration_loss_units",
            ),
            (
                QuoteRequest {
                    width_cm: Decimal::MAX,
                    ..valid_request()
                },
                "width_cm",
            ),
            (
                QuoteRequest {
                    height_cm: Some(dec!(0.001)),
                    ..valid_request()
                },
                "height_cm",
            ),
            (
                QuoteRequest {
                    margin: Some(Percent::new(dec!(100.01))),
                    ..valid_request()
                },
                "margin",
            ),
            (
                QuoteRequest {
                    silk_unit_price: Some(Money::new(dec!(100000.01))),
                    ..valid_request()
                },
                "silk_unit_price",
            ),
        ];

        for (request, field) in cases {
            match validate_request(&request) {
                Err(ValidationError::OutOfRange { field: got, .. }) => assert_eq!(got, field),
                other => panic!("{field}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let request = QuoteRequest {
            width_cm: MAX_DIMENSION_CM,
            height_cm: Some(MIN_HEIGHT_CM),
            quantity: MAX_QUANTITY,
            calibration_loss_units: Some(MAX_QUANTITY),
            margin: Some(Percent::new(MAX_PERCENT)),
            silk_unit_price: Some(Money::new(MAX_UNIT_PRICE)),
            ..valid_request()
        };
        assert!(validate_request(&request).is_ok());
        // negative losses are read as zero downstream
        assert!(validate_loss_units("calibration_loss_units", i64::MIN).is_ok());
    }

    #[test]
    fn test_reference_values() {
        let material = MaterialSpec {
            id: 1,
            name: "TNT 40g".to_string(),
            cost_per_cm: Money::new(dec!(0.01)),
            roll_height_cm: Some(dec!(-95)),
            state_tax_rate: None,
        };
        let taxes = vec![TaxComponent::new("PIS", Percent::new(dec!(1.65)))];
        let configuration = Configuration::default();
        assert!(validate_reference(&material, &taxes, Percent::new(dec!(18)), &configuration).is_ok());

        let pricey = MaterialSpec {
            cost_per_cm: Money::new(Decimal::MAX),
            ..material.clone()
        };
        assert!(validate_reference(&pricey, &taxes, Percent::zero(), &configuration).is_err());

        let tall = MaterialSpec {
            roll_height_cm: Some(Decimal::MAX),
            ..material.clone()
        };
        assert!(validate_reference(&tall, &taxes, Percent::zero(), &configuration).is_err());

        let bad_tax = vec![TaxComponent::new("COFINS", Percent::new(dec!(-7.6)))];
        assert_eq!(
            validate_reference(&material, &bad_tax, Percent::zero(), &configuration),
            Err(ValidationError::must_not_be_negative("fixed_taxes.COFINS"))
        );

        let configuration = Configuration {
            service_unit_price: Money::new(Decimal::MAX),
            ..Configuration::default()
        };
        assert!(validate_reference(&material, &taxes, Percent::zero(), &configuration).is_err());
    }

    #[test]
    fn test_state_code() {
        assert_eq!(validate_state_code("sp").unwrap(), "SP");
        assert!(validate_state_code("SPA").is_err());
        assert!(validate_state_code("S1").is_err());
        assert!(validate_state_code("").is_err());

        let request = QuoteRequest {
            state: Some("  ".to_string()),
            ..valid_request()
        };
        assert!(validate_request(&request).is_ok());

        let request = QuoteRequest {
            state: Some("Minas".to_string()),
            ..valid_request()
        };
        assert!(matches!(
            validate_request(&request),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_service_lines_checked() {
        let request = QuoteRequest {
            services: vec![ServiceLineItem {
                id: None,
                name: "Silk".to_string(),
                unit_price: Money::new(dec!(-0.1)),
                tax_rate: Percent::zero(),
            }],
            ..valid_request()
        };
        assert_eq!(
            validate_request(&request),
            Err(ValidationError::must_not_be_negative("services.unit_price"))
        );
    }
}
