//! # Domain Types
//!
//! Reference data snapshots and the quote request.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data (read-only snapshots)        Request                    │
//! │  ┌─────────────────┐ ┌─────────────────┐     ┌─────────────────────┐   │
//! │  │  MaterialSpec   │ │  TaxComponent   │     │    QuoteRequest     │   │
//! │  │  ─────────────  │ │  ─────────────  │     │  ─────────────────  │   │
//! │  │  cost_per_cm    │ │  name           │     │  material ref       │   │
//! │  │  roll_height_cm │ │  rate (Percent) │     │  width / height     │   │
//! │  │  state_tax_rate │ └─────────────────┘     │  quantity           │   │
//! │  └─────────────────┘ ┌─────────────────┐     │  margin, commission │   │
//! │  ┌─────────────────┐ │ ServiceLineItem │     │  discount           │   │
//! │  │  Configuration  │ │  unit_price     │     │  allowances         │   │
//! │  │  stored defaults│ │  tax_rate       │     │  services           │   │
//! │  └─────────────────┘ └─────────────────┘     └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Request fields accept the Portuguese payload names used by the original
//! web client (`gramatura_id`, `largura_cm`, `quantidade`, ...) as aliases.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, Percent};

// =============================================================================
// Material
// =============================================================================

/// A purchasable fabric grade ("gramatura").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialSpec {
    pub id: i64,

    /// Display name, unique (e.g. "TNT 40g").
    pub name: String,

    /// Cost per cm of width, for the full roll height.
    pub cost_per_cm: Money,

    /// Roll height in cm. `None` when unknown; never zero or negative.
    #[ts(type = "number | null")]
    pub roll_height_cm: Option<Decimal>,

    /// Inter-state ICMS used when the buyer holds a state registration.
    pub state_tax_rate: Option<Percent>,
}

impl MaterialSpec {
    /// Material cost of one unit for the given width.
    ///
    /// `cost_per_cm × width / 100`, kept at full precision.
    pub fn unit_cost(&self, effective_width_cm: Decimal) -> Money {
        self.cost_per_cm.times(effective_width_cm / Decimal::ONE_HUNDRED)
    }
}

/// How a request points at a material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialRef {
    Id(i64),
    Name(String),
}

impl std::fmt::Display for MaterialRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialRef::Id(id) => write!(f, "id {}", id),
            MaterialRef::Name(name) => write!(f, "'{}'", name),
        }
    }
}

// =============================================================================
// Taxes
// =============================================================================

/// A named percentage charged on the final price (PIS, COFINS, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxComponent {
    pub name: String,
    pub rate: Percent,
}

impl TaxComponent {
    pub fn new(name: impl Into<String>, rate: Percent) -> Self {
        TaxComponent {
            name: name.into(),
            rate,
        }
    }
}

/// One row of the national ICMS table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StateTaxRate {
    /// Two-letter state code (UF).
    pub state: String,
    pub rate: Percent,
}

// =============================================================================
// Services
// =============================================================================

/// An extra charge billed outside the markup formula (printing, silk...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServiceLineItem {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(alias = "nome")]
    pub name: String,

    #[serde(alias = "valor")]
    pub unit_price: Money,

    /// Tax charged on top of the unit price (service invoice).
    #[serde(default, alias = "imposto_percentual")]
    pub tax_rate: Percent,
}

impl ServiceLineItem {
    /// `unit_price × (1 + tax%/100)`.
    pub fn unit_price_with_tax(&self) -> Money {
        self.unit_price + self.tax_rate.of(self.unit_price)
    }

    /// Charge for an order. Calibration losses are never billed here.
    pub fn total_for(&self, quantity: i64) -> Money {
        self.unit_price_with_tax().multiply_quantity(quantity)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Stored pricing defaults, already normalized (no missing columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Configuration {
    pub margin: Percent,
    pub other_costs: Percent,
    /// Extra units produced to absorb machine calibration waste.
    pub calibration_loss_units: i64,
    /// Default silk price per unit.
    pub service_unit_price: Money,
    #[ts(type = "number")]
    pub handle_size_cm: Decimal,
}

impl Default for Configuration {
    /// All zero: the fallback when no configuration row exists.
    fn default() -> Self {
        Configuration {
            margin: Percent::zero(),
            other_costs: Percent::zero(),
            calibration_loss_units: 0,
            service_unit_price: Money::zero(),
            handle_size_cm: Decimal::ZERO,
        }
    }
}

// =============================================================================
// Quote Request
// =============================================================================

/// One calculation input.
///
/// `margin`, `other_costs`, `calibration_loss_units` and `handle_size_cm`
/// fall back to [`Configuration`] when absent. A missing quantity means one
/// unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct QuoteRequest {
    #[serde(alias = "gramatura_id")]
    pub material_id: Option<i64>,

    #[serde(alias = "gramatura_nome")]
    pub material_name: Option<String>,

    #[serde(alias = "largura_cm")]
    #[ts(type = "number")]
    pub width_cm: Decimal,

    /// Product height (one panel), mandatory.
    #[serde(alias = "altura_cm")]
    #[ts(type = "number | null")]
    pub height_cm: Option<Decimal>,

    #[serde(alias = "quantidade")]
    pub quantity: i64,

    #[serde(alias = "margem")]
    pub margin: Option<Percent>,

    #[serde(alias = "comissao")]
    pub commission: Percent,

    #[serde(alias = "outros_custos")]
    pub other_costs: Option<Percent>,

    #[serde(alias = "perdas_calibracao_un")]
    pub calibration_loss_units: Option<i64>,

    /// Destination state (UF).
    #[serde(alias = "estado")]
    pub state: Option<String>,

    /// Buyer holds a state tax registration (IE).
    #[serde(alias = "cliente_tem_ie")]
    pub buyer_has_state_registration: bool,

    /// Percentage points taken off the margin.
    #[serde(alias = "desconto_percentual")]
    pub discount: Option<Percent>,

    /// Side gusset, added twice to the width.
    #[serde(alias = "lateral_cm")]
    #[ts(type = "number | null")]
    pub side_fold_cm: Option<Decimal>,

    /// Bottom gusset, added once to the unit height.
    #[serde(alias = "fundo_cm")]
    #[ts(type = "number | null")]
    pub base_cm: Option<Decimal>,

    #[serde(alias = "incluir_alca")]
    pub include_handle: bool,

    #[serde(alias = "tamanho_alca")]
    #[ts(type = "number | null")]
    pub handle_size_cm: Option<Decimal>,

    #[serde(alias = "incluir_valor_silk")]
    pub include_silk: bool,

    #[serde(alias = "valor_silk")]
    pub silk_unit_price: Option<Money>,

    #[serde(alias = "servicos")]
    pub services: Vec<ServiceLineItem>,
}

impl Default for QuoteRequest {
    fn default() -> Self {
        QuoteRequest {
            material_id: None,
            material_name: None,
            width_cm: Decimal::ZERO,
            height_cm: None,
            quantity: 1,
            margin: None,
            commission: Percent::zero(),
            other_costs: None,
            calibration_loss_units: None,
            state: None,
            buyer_has_state_registration: false,
            discount: None,
            side_fold_cm: None,
            base_cm: None,
            include_handle: false,
            handle_size_cm: None,
            include_silk: false,
            silk_unit_price: None,
            services: Vec::new(),
        }
    }
}

impl QuoteRequest {
    /// Returns the material reference, preferring the id over the name.
    pub fn material_ref(&self) -> Result<MaterialRef, ValidationError> {
        if let Some(id) = self.material_id {
            return Ok(MaterialRef::Id(id));
        }

        match self.material_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(MaterialRef::Name(name.to_string())),
            _ => Err(ValidationError::required("material_id or material_name")),
        }
    }

    /// Whether a non-zero discount was asked for.
    pub fn has_discount(&self) -> bool {
        self.discount.is_some_and(|d| !d.is_zero())
    }
}

// =============================================================================
// Batch
// =============================================================================

/// One size in a batch; overrides the dimensions of the shared context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchItem {
    #[serde(default, alias = "nome")]
    pub name: String,

    #[serde(alias = "largura_cm")]
    #[ts(type = "number")]
    pub width_cm: Decimal,

    #[serde(default, alias = "altura_cm")]
    #[ts(type = "number | null")]
    pub height_cm: Option<Decimal>,

    #[serde(default, alias = "lateral_cm")]
    #[ts(type = "number | null")]
    pub side_fold_cm: Option<Decimal>,

    #[serde(default, alias = "fundo_cm")]
    #[ts(type = "number | null")]
    pub base_cm: Option<Decimal>,

    #[serde(default, alias = "incluir_alca", alias = "tem_alca")]
    pub include_handle: bool,

    /// Overrides the context quantity when present.
    #[serde(default, alias = "quantidade")]
    pub quantity: Option<i64>,
}

impl BatchItem {
    /// Builds the full request for this item.
    pub fn apply_to(&self, context: &QuoteRequest) -> QuoteRequest {
        QuoteRequest {
            width_cm: self.width_cm,
            height_cm: self.height_cm,
            side_fold_cm: self.side_fold_cm,
            base_cm: self.base_cm,
            include_handle: self.include_handle,
            quantity: self.quantity.unwrap_or(context.quantity),
            ..context.clone()
        }
    }
}

/// Several sizes quoted with the same material, taxes and margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchRequest {
    #[serde(alias = "contexto")]
    pub context: QuoteRequest,

    #[serde(alias = "itens")]
    pub items: Vec<BatchItem>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_cost_uses_width_in_meters() {
        let material = MaterialSpec {
            id: 1,
            name: "TNT 40g".to_string(),
            cost_per_cm: Money::new(dec!(1.0)),
            roll_height_cm: Some(dec!(95)),
            state_tax_rate: None,
        };
        assert_eq!(material.unit_cost(dec!(40)).amount(), dec!(0.4));
    }

    #[test]
    fn test_service_unit_price_with_tax() {
        let service = ServiceLineItem {
            id: None,
            name: "Silk 1 cor".to_string(),
            unit_price: Money::new(dec!(0.20)),
            tax_rate: Percent::new(dec!(5)),
        };
        assert_eq!(service.unit_price_with_tax().amount(), dec!(0.21));
        assert_eq!(service.total_for(1000).amount(), dec!(210));
    }

    #[test]
    fn test_material_ref_prefers_id() {
        let request = QuoteRequest {
            material_id: Some(7),
            material_name: Some("TNT 40g".to_string()),
            ..QuoteRequest::default()
        };
        assert_eq!(request.material_ref().unwrap(), MaterialRef::Id(7));

        let request = QuoteRequest {
            material_name: Some("  TNT 40g ".to_string()),
            ..QuoteRequest::default()
        };
        assert_eq!(
            request.material_ref().unwrap(),
            MaterialRef::Name("TNT 40g".to_string())
        );

        let request = QuoteRequest {
            material_name: Some("   ".to_string()),
            ..QuoteRequest::default()
        };
        assert!(request.material_ref().is_err());
    }

    #[test]
    fn test_request_accepts_portuguese_payload() {
        let json = r#"{
            "gramatura_id": 3,
            "largura_cm": 40,
            "altura_cm": 10.5,
            "quantidade": 500,
            "margem": 12,
            "comissao": 1.5,
            "estado": "MG",
            "cliente_tem_ie": true,
            "incluir_alca": true,
            "servicos": [{"nome": "Silk", "valor": 0.3, "imposto_percentual": 5}]
        }"#;

        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.material_id, Some(3));
        assert_eq!(request.width_cm, dec!(40));
        assert_eq!(request.height_cm, Some(dec!(10.5)));
        assert_eq!(request.quantity, 500);
        assert_eq!(request.margin, Some(Percent::new(dec!(12))));
        assert_eq!(request.commission, Percent::new(dec!(1.5)));
        assert!(request.buyer_has_state_registration);
        assert!(request.include_handle);
        assert_eq!(request.services.len(), 1);
        assert_eq!(request.services[0].unit_price, Money::new(dec!(0.3)));
        assert!(request.other_costs.is_none());
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        let request: QuoteRequest = serde_json::from_str(r#"{"material_id": 1}"#).unwrap();
        assert_eq!(request.quantity, 1);
    }

    #[test]
    fn test_has_discount() {
        let mut request = QuoteRequest::default();
        assert!(!request.has_discount());
        request.discount = Some(Percent::zero());
        assert!(!request.has_discount());
        request.discount = Some(Percent::new(dec!(2)));
        assert!(request.has_discount());
    }

    #[test]
    fn test_batch_item_overrides_dimensions_only() {
        let context = QuoteRequest {
            material_id: Some(1),
            width_cm: dec!(10),
            quantity: 300,
            margin: Some(Percent::new(dec!(20))),
            ..QuoteRequest::default()
        };
        let item = BatchItem {
            name: "P".to_string(),
            width_cm: dec!(25),
            height_cm: Some(dec!(30)),
            side_fold_cm: Some(dec!(5)),
            base_cm: None,
            include_handle: true,
            quantity: None,
        };

        let request = item.apply_to(&context);
        assert_eq!(request.width_cm, dec!(25));
        assert_eq!(request.height_cm, Some(dec!(30)));
        assert_eq!(request.side_fold_cm, Some(dec!(5)));
        assert!(request.include_handle);
        assert_eq!(request.quantity, 300);
        assert_eq!(request.material_id, Some(1));
        assert_eq!(request.margin, Some(Percent::new(dec!(20))));
    }
}
