//! # Quote Assembler
//!
//! Turns a request plus a snapshot of reference data into a [`QuoteResult`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  QuoteRequest ──► validate ──► resolve defaults (Configuration)         │
//! │                                        │                                │
//! │        ┌───────────────────────────────┼──────────────────────┐         │
//! │        ▼                               ▼                      ▼         │
//! │  effective width               fixed taxes (no ICMS)   unit geometry    │
//! │  unit cost × (qty + losses)    canonical order         roll yield       │
//! │        │                               │                                │
//! │        └──────────► solve_with_discount ◄──── state tax rate            │
//! │                            │                                            │
//! │                            ▼                                            │
//! │               decompose ──► round ──► + silk + services ──► totals      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is computed at full precision and rounded only when the
//! result blocks are filled in.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{round2, Money, Percent};
use crate::pricing::{decompose, solve_with_discount, PriceComponents};
use crate::roll_yield::{compute_roll_yield, RollYield, UnitGeometry};
use crate::tax::applicable_fixed_taxes;
use crate::types::{Configuration, MaterialSpec, QuoteRequest, TaxComponent};
use crate::validation::{validate_reference, validate_request};

// =============================================================================
// Result Blocks
// =============================================================================

/// The material the quote was priced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialSummary {
    pub id: i64,
    pub name: String,
    pub cost_per_cm: Money,
    #[ts(type = "number | null")]
    pub roll_height_cm: Option<Decimal>,
}

/// Measures as entered, plus the derived effective ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dimensions {
    #[ts(type = "number")]
    pub width_cm: Decimal,
    #[ts(type = "number")]
    pub side_fold_cm: Decimal,
    #[ts(type = "number")]
    pub effective_width_cm: Decimal,
    #[ts(type = "number")]
    pub height_cm: Decimal,
    #[ts(type = "number")]
    pub base_cm: Decimal,
    /// Handle height actually added (0 when not included).
    #[ts(type = "number")]
    pub handle_cm: Decimal,
    #[ts(type = "number")]
    pub effective_unit_height_cm: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostBlock {
    pub quantity: i64,
    pub calibration_loss_units: i64,
    /// Units actually produced: quantity plus calibration losses.
    pub produced_units: i64,
    pub material_unit_cost: Money,
    pub total_cost: Money,
}

/// One percentage of the price and its value in currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComponentValue {
    pub percent: Percent,
    pub value: Money,
}

impl ComponentValue {
    fn new(percent: Percent, value: Money) -> Self {
        ComponentValue {
            percent: percent.rounded(),
            value: value.rounded(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    /// Margin after discount.
    pub margin: ComponentValue,
    pub commission: ComponentValue,
    pub other_costs: ComponentValue,
    pub fixed_taxes: ComponentValue,
    pub state_tax: ComponentValue,
    pub total_percent: Percent,
}

/// A single fixed tax, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FixedTaxLine {
    pub name: String,
    pub percent: Percent,
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountDetail {
    pub applied: bool,
    pub discount: Percent,
    pub original_margin: Percent,
    pub applied_margin: Percent,
    pub price_without_discount: Money,
    pub discount_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceLine {
    pub name: String,
    pub unit_price: Money,
    pub tax_rate: Percent,
    pub unit_price_with_tax: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SilkDetail {
    pub included: bool,
    pub unit_price: Money,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteTotals {
    pub product_price: Money,
    pub silk_total: Money,
    pub services_total: Money,
    /// `product_price + silk_total + services_total`, from rounded parts.
    pub final_total: Money,
    /// Product price per ordered unit.
    pub unit_price: Money,
    /// Final total per ordered unit.
    pub unit_price_total: Money,
}

/// Non-fatal conditions found while computing a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum QuoteWarning {
    /// Percentages reach 100% of the price; the price is not meaningful.
    PercentagesConsumePrice { total_percent: Percent },
    /// The material has no roll height, so no yield was computed.
    MissingRollHeight,
    /// One unit is taller than the roll.
    UnitExceedsRoll,
}

/// The full decomposed quote. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteResult {
    pub material: MaterialSummary,
    pub dimensions: Dimensions,
    pub cost: CostBlock,
    pub breakdown: PriceBreakdown,
    pub fixed_taxes: Vec<FixedTaxLine>,
    pub discount: DiscountDetail,
    pub roll_yield: Option<RollYield>,
    pub services: Vec<ServiceLine>,
    pub silk: SilkDetail,
    pub totals: QuoteTotals,
    /// Rounded cost plus every rounded component value.
    pub checksum: Money,
    pub warnings: Vec<QuoteWarning>,
}

// =============================================================================
// Assembler
// =============================================================================

/// Computes a complete quote.
///
/// Pure: reads nothing but its arguments. `fixed_taxes` may contain ICMS
/// rows; they are ignored in favour of `state_tax_rate`.
///
/// ## Errors
/// - `CoreError::Validation` when the request is malformed (see
///   [`validate_request`])
/// - `CoreError::InvalidReferenceData` when a stored value is out of range
///   (see [`validate_reference`])
pub fn compute_quote(
    request: &QuoteRequest,
    material: &MaterialSpec,
    fixed_taxes: &[TaxComponent],
    state_tax_rate: Percent,
    configuration: &Configuration,
) -> CoreResult<QuoteResult> {
    validate_request(request)?;
    validate_reference(material, fixed_taxes, state_tax_rate, configuration)
        .map_err(|err| CoreError::InvalidReferenceData(err.to_string()))?;

    // Defaults
    let height = request.height_cm.unwrap_or(Decimal::ZERO);
    let quantity = request.quantity;
    let margin = request.margin.unwrap_or(configuration.margin);
    let other_costs = request.other_costs.unwrap_or(configuration.other_costs);
    let losses = request
        .calibration_loss_units
        .unwrap_or(configuration.calibration_loss_units)
        .max(0);
    let side_fold = request.side_fold_cm.unwrap_or(Decimal::ZERO);
    let base = request.base_cm.unwrap_or(Decimal::ZERO);
    let handle = if request.include_handle {
        request.handle_size_cm.unwrap_or(configuration.handle_size_cm)
    } else {
        Decimal::ZERO
    };

    // Cost
    let effective_width = request.width_cm + Decimal::TWO * side_fold;
    let unit_cost = material.unit_cost(effective_width);
    let produced_units = quantity + losses;
    let total_cost = unit_cost.multiply_quantity(produced_units);

    // Price
    let taxes = applicable_fixed_taxes(fixed_taxes);
    let fixed_total: Percent = taxes.iter().map(|t| t.rate).sum();

    let components = PriceComponents {
        margin,
        commission: request.commission,
        other_costs,
        fixed_taxes: fixed_total,
        state_tax: state_tax_rate,
    };
    let discount = request.discount.filter(|_| request.has_discount());
    let solved = solve_with_discount(total_cost, &components, discount);
    let price = solved.final_price.price;
    let parts = decompose(price, &solved.applied);

    debug!(
        material = %material.name,
        cost = %total_cost.amount(),
        price = %price.amount(),
        total_percent = %solved.applied.total(),
        "Solved quote price"
    );

    let mut warnings = Vec::new();
    if solved.final_price.clamped || solved.undiscounted.clamped {
        warn!(
            material = %material.name,
            total_percent = %solved.applied.total(),
            "Quote percentages consume the whole price"
        );
        warnings.push(QuoteWarning::PercentagesConsumePrice {
            total_percent: solved.applied.total().rounded(),
        });
    }

    let fixed_tax_lines = taxes
        .iter()
        .map(|tax| FixedTaxLine {
            name: tax.name.clone(),
            percent: tax.rate.rounded(),
            value: tax.rate.of(price).rounded(),
        })
        .collect();

    // Yield
    let geometry = UnitGeometry {
        product_height_cm: height,
        base_cm: base,
        handle_cm: handle,
    };
    let roll_yield = compute_roll_yield(material.roll_height_cm, &geometry, quantity);
    match &roll_yield {
        None => warnings.push(QuoteWarning::MissingRollHeight),
        Some(y) if y.units_per_roll == 0 => warnings.push(QuoteWarning::UnitExceedsRoll),
        Some(_) => {}
    }

    // Extras
    let services: Vec<ServiceLine> = request
        .services
        .iter()
        .map(|service| ServiceLine {
            name: service.name.clone(),
            unit_price: service.unit_price.rounded(),
            tax_rate: service.tax_rate.rounded(),
            unit_price_with_tax: service.unit_price_with_tax().rounded(),
            total: service.total_for(quantity).rounded(),
        })
        .collect();
    let services_total: Money = services.iter().map(|s| s.total).sum();

    let silk_unit = if request.include_silk {
        request
            .silk_unit_price
            .unwrap_or(configuration.service_unit_price)
    } else {
        Money::zero()
    };
    let silk = SilkDetail {
        included: request.include_silk,
        unit_price: silk_unit.rounded(),
        total: silk_unit.multiply_quantity(quantity).rounded(),
    };

    // Totals
    let product_price = price.rounded();
    let silk_total = silk.total;
    let final_total = product_price + silk_total + services_total;

    Ok(QuoteResult {
        material: MaterialSummary {
            id: material.id,
            name: material.name.clone(),
            cost_per_cm: material.cost_per_cm,
            roll_height_cm: material.roll_height_cm,
        },
        dimensions: Dimensions {
            width_cm: request.width_cm,
            side_fold_cm: side_fold,
            effective_width_cm: round2(effective_width),
            height_cm: height,
            base_cm: base,
            handle_cm: handle,
            effective_unit_height_cm: round2(geometry.effective_height()),
        },
        cost: CostBlock {
            quantity,
            calibration_loss_units: losses,
            produced_units,
            material_unit_cost: unit_cost.rounded(),
            total_cost: total_cost.rounded(),
        },
        breakdown: PriceBreakdown {
            margin: ComponentValue::new(solved.applied.margin, parts.margin),
            commission: ComponentValue::new(solved.applied.commission, parts.commission),
            other_costs: ComponentValue::new(solved.applied.other_costs, parts.other_costs),
            fixed_taxes: ComponentValue::new(solved.applied.fixed_taxes, parts.fixed_taxes),
            state_tax: ComponentValue::new(solved.applied.state_tax, parts.state_tax),
            total_percent: solved.applied.total().rounded(),
        },
        fixed_taxes: fixed_tax_lines,
        discount: DiscountDetail {
            applied: discount.is_some(),
            discount: discount.unwrap_or_else(Percent::zero).rounded(),
            original_margin: margin.rounded(),
            applied_margin: solved.applied.margin.rounded(),
            price_without_discount: solved.undiscounted.price.rounded(),
            discount_value: solved.discount_value,
        },
        roll_yield,
        services,
        silk,
        totals: QuoteTotals {
            product_price,
            silk_total,
            services_total,
            final_total,
            unit_price: product_price.per_unit(quantity).rounded(),
            unit_price_total: final_total.per_unit(quantity).rounded(),
        },
        checksum: parts.checksum(total_cost),
        warnings,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::types::ServiceLineItem;
    use crate::validation::{MAX_DIMENSION_CM, MAX_PERCENT, MAX_QUANTITY, MAX_UNIT_PRICE};
    use rust_decimal_macros::dec;

    fn material() -> MaterialSpec {
        MaterialSpec {
            id: 1,
            name: "TNT 40g".to_string(),
            cost_per_cm: Money::new(dec!(1)),
            roll_height_cm: Some(dec!(95)),
            state_tax_rate: Some(Percent::new(dec!(12))),
        }
    }

    fn taxes() -> Vec<TaxComponent> {
        vec![
            TaxComponent::new("COFINS", Percent::new(dec!(6))),
            TaxComponent::new("ICMS", Percent::new(dec!(18))),
            TaxComponent::new("PIS", Percent::new(dec!(4))),
        ]
    }

    /// cost = 1.00/cm × 40 cm / 100 × 1000 = 400
    fn request() -> QuoteRequest {
        QuoteRequest {
            material_id: Some(1),
            width_cm: dec!(40),
            height_cm: Some(dec!(10)),
            quantity: 1000,
            margin: Some(Percent::new(dec!(10))),
            commission: Percent::new(dec!(1)),
            other_costs: Some(Percent::new(dec!(2))),
            ..QuoteRequest::default()
        }
    }

    fn quote(request: &QuoteRequest) -> QuoteResult {
        compute_quote(request, &material(), &taxes(), Percent::zero(), &Configuration::default())
            .unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        let result = quote(&request());

        assert_eq!(result.cost.total_cost.amount(), dec!(400));
        assert_eq!(result.cost.material_unit_cost.amount(), dec!(0.40));
        assert_eq!(result.breakdown.total_percent.value(), dec!(23));
        assert_eq!(result.totals.product_price.amount(), dec!(519.48));
        assert_eq!(result.checksum, result.totals.product_price);
        assert_eq!(result.totals.unit_price.amount(), dec!(0.52));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_fixed_taxes_exclude_icms_and_are_ordered() {
        let result = quote(&request());

        let names: Vec<&str> = result.fixed_taxes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["PIS", "COFINS"]);
        assert_eq!(result.breakdown.fixed_taxes.percent.value(), dec!(10));
        assert_eq!(result.fixed_taxes[0].value.amount(), dec!(20.78));
        assert_eq!(result.fixed_taxes[1].value.amount(), dec!(31.17));
    }

    #[test]
    fn test_state_tax_is_separate_component() {
        let result = compute_quote(
            &request(),
            &material(),
            &taxes(),
            Percent::new(dec!(18)),
            &Configuration::default(),
        )
        .unwrap();

        // 400 / (1 − 0.41)
        assert_eq!(result.totals.product_price.amount(), dec!(677.97));
        assert_eq!(result.breakdown.state_tax.percent.value(), dec!(18));
        assert_eq!(result.breakdown.state_tax.value.amount(), dec!(122.03));
        assert_eq!(result.checksum, result.totals.product_price);
    }

    #[test]
    fn test_roll_yield_and_dimensions() {
        let result = quote(&request());

        assert_eq!(result.dimensions.effective_width_cm, dec!(40));
        assert_eq!(result.dimensions.effective_unit_height_cm, dec!(20));
        let y = result.roll_yield.unwrap();
        assert_eq!(y.units_per_roll, 4);
        assert_eq!(y.utilization_pct, dec!(84.21));
    }

    #[test]
    fn test_side_fold_widens_and_handle_heightens() {
        let configuration = Configuration {
            handle_size_cm: dec!(5),
            ..Configuration::default()
        };
        let request = QuoteRequest {
            side_fold_cm: Some(dec!(5)),
            base_cm: Some(dec!(3)),
            include_handle: true,
            ..request()
        };
        let result =
            compute_quote(&request, &material(), &taxes(), Percent::zero(), &configuration).unwrap();

        assert_eq!(result.dimensions.effective_width_cm, dec!(50));
        assert_eq!(result.cost.total_cost.amount(), dec!(500));
        assert_eq!(result.dimensions.handle_cm, dec!(5));
        assert_eq!(result.dimensions.effective_unit_height_cm, dec!(28));
    }

    #[test]
    fn test_handle_size_ignored_without_handle() {
        let request = QuoteRequest {
            handle_size_cm: Some(dec!(7)),
            ..request()
        };
        let result = quote(&request);
        assert_eq!(result.dimensions.handle_cm, dec!(0));
        assert_eq!(result.dimensions.effective_unit_height_cm, dec!(20));
    }

    #[test]
    fn test_calibration_losses_raise_cost_only() {
        let request = QuoteRequest {
            calibration_loss_units: Some(100),
            services: vec![ServiceLineItem {
                id: None,
                name: "Corte".to_string(),
                unit_price: Money::new(dec!(0.10)),
                tax_rate: Percent::zero(),
            }],
            ..request()
        };
        let result = quote(&request);

        assert_eq!(result.cost.produced_units, 1100);
        assert_eq!(result.cost.total_cost.amount(), dec!(440));
        assert_eq!(result.totals.services_total.amount(), dec!(100));
        assert_eq!(result.roll_yield.unwrap().rolls_needed, Some(250));
    }

    #[test]
    fn test_negative_configured_losses_count_as_zero() {
        let configuration = Configuration {
            calibration_loss_units: -20,
            ..Configuration::default()
        };
        let result = compute_quote(
            &QuoteRequest { calibration_loss_units: None, ..request() },
            &material(),
            &taxes(),
            Percent::zero(),
            &configuration,
        )
        .unwrap();
        assert_eq!(result.cost.calibration_loss_units, 0);
        assert_eq!(result.cost.total_cost.amount(), dec!(400));
    }

    #[test]
    fn test_configuration_defaults_fill_missing_fields() {
        let configuration = Configuration {
            margin: Percent::new(dec!(10)),
            other_costs: Percent::new(dec!(2)),
            ..Configuration::default()
        };
        let request = QuoteRequest {
            margin: None,
            other_costs: None,
            ..request()
        };
        let result =
            compute_quote(&request, &material(), &taxes(), Percent::zero(), &configuration).unwrap();
        assert_eq!(result.totals.product_price.amount(), dec!(519.48));
    }

    #[test]
    fn test_discount_detail() {
        let request = QuoteRequest {
            discount: Some(Percent::new(dec!(4))),
            ..request()
        };
        let result = quote(&request);

        assert!(result.discount.applied);
        assert_eq!(result.discount.original_margin.value(), dec!(10));
        assert_eq!(result.discount.applied_margin.value(), dec!(6));
        assert_eq!(result.discount.price_without_discount.amount(), dec!(519.48));
        assert_eq!(result.totals.product_price.amount(), dec!(493.83));
        assert_eq!(result.discount.discount_value.amount(), dec!(25.65));
        assert_eq!(result.checksum, result.totals.product_price);
    }

    #[test]
    fn test_zero_discount_matches_no_discount() {
        let with_zero = quote(&QuoteRequest {
            discount: Some(Percent::zero()),
            ..request()
        });
        let without = quote(&request());

        assert!(!with_zero.discount.applied);
        assert!(with_zero.discount.discount_value.is_zero());
        assert_eq!(with_zero.totals, without.totals);
    }

    #[test]
    fn test_silk_and_services_are_additive() {
        let configuration = Configuration {
            service_unit_price: Money::new(dec!(0.15)),
            ..Configuration::default()
        };
        let request = QuoteRequest {
            include_silk: true,
            services: vec![ServiceLineItem {
                id: None,
                name: "Silk 2 cores".to_string(),
                unit_price: Money::new(dec!(0.20)),
                tax_rate: Percent::new(dec!(5)),
            }],
            ..request()
        };
        let result =
            compute_quote(&request, &material(), &taxes(), Percent::zero(), &configuration).unwrap();

        assert_eq!(result.silk.unit_price.amount(), dec!(0.15));
        assert_eq!(result.silk.total.amount(), dec!(150));
        assert_eq!(result.services[0].unit_price_with_tax.amount(), dec!(0.21));
        assert_eq!(result.totals.services_total.amount(), dec!(210));
        assert_eq!(result.totals.product_price.amount(), dec!(519.48));
        assert_eq!(result.totals.final_total.amount(), dec!(879.48));
        assert_eq!(
            result.totals.final_total,
            result.totals.product_price + result.totals.silk_total + result.totals.services_total
        );
        assert_eq!(result.totals.unit_price_total.amount(), dec!(0.88));
        // extras never enter the markup
        assert_eq!(result.checksum.amount(), dec!(519.48));
    }

    #[test]
    fn test_silk_price_from_request_wins() {
        let request = QuoteRequest {
            include_silk: true,
            silk_unit_price: Some(Money::new(dec!(0.05))),
            ..request()
        };
        let result = quote(&request);
        assert_eq!(result.silk.total.amount(), dec!(50));
    }

    #[test]
    fn test_silk_price_ignored_when_not_included() {
        let request = QuoteRequest {
            include_silk: false,
            silk_unit_price: Some(Money::new(dec!(0.05))),
            ..request()
        };
        let result = quote(&request);
        assert!(!result.silk.included);
        assert!(result.silk.total.is_zero());
    }

    #[test]
    fn test_degenerate_percentages_warn() {
        let request = QuoteRequest {
            margin: Some(Percent::new(dec!(90))),
            ..request()
        };
        let result = quote(&request);

        assert!(matches!(
            result.warnings.as_slice(),
            [QuoteWarning::PercentagesConsumePrice { .. }]
        ));
        assert!(result.totals.product_price.amount() > dec!(1000000));
    }

    #[test]
    fn test_missing_roll_height_warns() {
        let material = MaterialSpec {
            roll_height_cm: None,
            ..material()
        };
        let result =
            compute_quote(&request(), &material, &taxes(), Percent::zero(), &Configuration::default())
                .unwrap();

        assert!(result.roll_yield.is_none());
        assert_eq!(result.dimensions.effective_unit_height_cm, dec!(20));
        assert_eq!(result.warnings, vec![QuoteWarning::MissingRollHeight]);
    }

    #[test]
    fn test_oversize_unit_warns() {
        let request = QuoteRequest {
            height_cm: Some(dec!(60)),
            ..request()
        };
        let result = quote(&request);

        let y = result.roll_yield.unwrap();
        assert_eq!(y.units_per_roll, 0);
        assert_eq!(y.rolls_needed, None);
        assert_eq!(result.warnings, vec![QuoteWarning::UnitExceedsRoll]);
    }

    #[test]
    fn test_invalid_quantity_is_rejected() {
        let request = QuoteRequest {
            quantity: 0,
            ..request()
        };
        let err = compute_quote(&request, &material(), &taxes(), Percent::zero(), &Configuration::default())
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_huge_counts_are_rejected() {
        let requests = [
            QuoteRequest {
                quantity: i64::MAX,
                ..request()
            },
            QuoteRequest {
                calibration_loss_units: Some(i64::MAX),
                ..request()
            },
            QuoteRequest {
                width_cm: Decimal::MAX,
                ..request()
            },
            QuoteRequest {
                height_cm: Some(Decimal::MAX),
                ..request()
            },
            QuoteRequest {
                side_fold_cm: Some(Decimal::from(i64::MAX)),
                ..request()
            },
        ];

        for request in &requests {
            let err = compute_quote(
                request,
                &material(),
                &taxes(),
                Percent::zero(),
                &Configuration::default(),
            )
            .unwrap_err();
            assert!(
                matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })),
                "{err}"
            );
        }
    }

    #[test]
    fn test_out_of_range_reference_data_is_rejected() {
        let material = MaterialSpec {
            cost_per_cm: Money::new(Decimal::MAX),
            ..material()
        };
        let err =
            compute_quote(&request(), &material, &taxes(), Percent::zero(), &Configuration::default())
                .unwrap_err();
        assert!(matches!(err, CoreError::InvalidReferenceData(_)));

        let configuration = Configuration {
            calibration_loss_units: i64::MAX,
            ..Configuration::default()
        };
        let err = compute_quote(
            &QuoteRequest {
                calibration_loss_units: None,
                ..request()
            },
            &self::material(),
            &taxes(),
            Percent::zero(),
            &configuration,
        )
        .unwrap_err();
        assert!(err.to_string().contains("calibration_loss_units"));

        let err = compute_quote(
            &request(),
            &self::material(),
            &taxes(),
            Percent::new(dec!(250)),
            &Configuration::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidReferenceData(_)));
    }

    #[test]
    fn test_largest_accepted_inputs_stay_finite() {
        let max_percent = Percent::new(MAX_PERCENT);
        let max_price = Money::new(MAX_UNIT_PRICE);
        let material = MaterialSpec {
            cost_per_cm: max_price,
            roll_height_cm: Some(MAX_DIMENSION_CM),
            ..material()
        };
        let fixed = vec![
            TaxComponent::new("PIS", max_percent),
            TaxComponent::new("COFINS", max_percent),
        ];
        let request = QuoteRequest {
            width_cm: MAX_DIMENSION_CM,
            side_fold_cm: Some(MAX_DIMENSION_CM),
            height_cm: Some(MAX_DIMENSION_CM),
            base_cm: Some(MAX_DIMENSION_CM),
            quantity: MAX_QUANTITY,
            calibration_loss_units: Some(MAX_QUANTITY),
            margin: Some(max_percent),
            commission: max_percent,
            other_costs: Some(max_percent),
            discount: Some(max_percent),
            include_silk: true,
            silk_unit_price: Some(max_price),
            services: vec![ServiceLineItem {
                id: None,
                name: "Silk".to_string(),
                unit_price: max_price,
                tax_rate: max_percent,
            }],
            ..request()
        };

        let result =
            compute_quote(&request, &material, &fixed, max_percent, &Configuration::default())
                .unwrap();

        assert_eq!(result.cost.produced_units, 2 * MAX_QUANTITY);
        // 100000/cm × 30000 cm / 100 × 20_000_000
        assert_eq!(result.cost.total_cost.amount(), dec!(600000000000000));
        assert!(result.totals.product_price.amount() > result.cost.total_cost.amount());
        assert!(result.totals.final_total.amount() > Decimal::ZERO);
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, QuoteWarning::PercentagesConsumePrice { .. })));
    }

    #[test]
    fn test_checksum_tracks_price_for_any_component_mix() {
        let zero_or = |value: Decimal| [Percent::zero(), Percent::new(value)];
        let no_fixed: Vec<TaxComponent> = Vec::new();
        let fixed = vec![
            TaxComponent::new("PIS", Percent::new(dec!(1.65))),
            TaxComponent::new("COFINS", Percent::new(dec!(7.6))),
        ];
        let material = MaterialSpec {
            cost_per_cm: Money::new(dec!(0.37)),
            ..material()
        };

        let mut checked = 0;
        for margin in zero_or(dec!(12.5)) {
            for commission in zero_or(dec!(1.5)) {
                for other_costs in zero_or(dec!(2)) {
                    for taxes in [&no_fixed, &fixed] {
                        for state_tax in zero_or(dec!(18)) {
                            for discount in [None, Some(Percent::new(dec!(3)))] {
                                let request = QuoteRequest {
                                    width_cm: dec!(37.3),
                                    quantity: 777,
                                    margin: Some(margin),
                                    commission,
                                    other_costs: Some(other_costs),
                                    discount,
                                    ..request()
                                };
                                let result = compute_quote(
                                    &request,
                                    &material,
                                    taxes,
                                    state_tax,
                                    &Configuration::default(),
                                )
                                .unwrap();

                                let breakdown = &result.breakdown;
                                let displayed = result.cost.total_cost
                                    + breakdown.margin.value
                                    + breakdown.commission.value
                                    + breakdown.other_costs.value
                                    + breakdown.fixed_taxes.value
                                    + breakdown.state_tax.value;
                                assert_eq!(result.checksum, displayed);

                                let drift =
                                    (result.checksum - result.totals.product_price).amount().abs();
                                assert!(drift <= dec!(0.03), "drift {drift} for {request:?}");
                                checked += 1;
                            }
                        }
                    }
                }
            }
        }
        assert_eq!(checked, 64);
    }

    #[test]
    fn test_result_serializes_numbers() {
        let result = quote(&request());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["totals"]["product_price"], serde_json::json!(519.48));
        assert_eq!(json["roll_yield"]["units_per_roll"], serde_json::json!(4));
    }
}
