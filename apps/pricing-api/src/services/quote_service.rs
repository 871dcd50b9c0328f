//! Quote orchestration.
//!
//! Reads the reference data a quote needs, resolves the ICMS rate and hands
//! everything to the pure calculator in `bobina_core`.
//!
//! ```text
//! QuoteRequest
//!     │ validate_request (before any read)
//!     │ material_ref() ──► ReferenceData::material
//!     │                    ReferenceData::fixed_taxes
//!     │                    ReferenceData::configuration(strict)
//!     │ state policy ───► Fixed(rate) | Table(state) ──► state_tax_rate
//!     ▼
//! compute_quote(request, material, taxes, icms, configuration)
//! ```
//!
//! Reference data is read fresh for every quote; nothing is cached.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bobina_core::tax::{normalize_state, StateTaxPolicy, StateTaxSource};
use bobina_core::validation::validate_request;
use bobina_core::{
    compute_quote, BatchRequest, CoreError, MaterialSpec, Percent, QuoteRequest, QuoteResult,
};
use bobina_db::{DbError, ReferenceData};

use crate::error::{ApiError, ApiResult};

/// Settings that shape how requests are priced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSettings {
    /// Reject quotes when the configuration row is missing.
    pub strict_configuration: bool,
    /// ICMS selection for buyers with a state registration.
    pub state_tax_policy: StateTaxPolicy,
}

/// One row of a batch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QuoteResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Batch response, entries in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    pub entries: Vec<BatchEntry>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Prices quote requests against a reference data source.
#[derive(Clone)]
pub struct QuoteService {
    reference: Arc<dyn ReferenceData>,
    settings: QuoteSettings,
}

impl QuoteService {
    pub fn new(reference: Arc<dyn ReferenceData>, settings: QuoteSettings) -> Self {
        Self {
            reference,
            settings,
        }
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    /// Prices a single request.
    pub async fn quote(&self, request: &QuoteRequest) -> ApiResult<QuoteResult> {
        validate_request(request)?;
        let material_ref = request.material_ref()?;

        let material = self
            .reference
            .material(&material_ref)
            .await
            .map_err(|err| match err {
                DbError::NotFound { .. } => {
                    ApiError::from(CoreError::MaterialNotFound(material_ref.to_string()))
                }
                other => other.into(),
            })?;

        let fixed_taxes = self.reference.fixed_taxes().await?;
        let configuration = self
            .reference
            .configuration(self.settings.strict_configuration)
            .await?;
        let state_tax_rate = self.state_tax_rate(request, &material).await?;

        debug!(
            material = %material.name,
            quantity = request.quantity,
            state_tax = %state_tax_rate,
            "Pricing quote"
        );

        let result = compute_quote(
            request,
            &material,
            &fixed_taxes,
            state_tax_rate,
            &configuration,
        )?;

        for warning in &result.warnings {
            warn!(material = %material.name, ?warning, "Quote warning");
        }

        Ok(result)
    }

    /// Prices every batch item with the shared context, sequentially.
    ///
    /// A failing item is reported in its entry and does not stop the batch.
    pub async fn quote_batch(&self, batch: &BatchRequest) -> BatchResponse {
        let mut entries = Vec::with_capacity(batch.items.len());

        for item in &batch.items {
            let request = item.apply_to(&batch.context);
            let entry = match self.quote(&request).await {
                Ok(result) => BatchEntry {
                    name: item.name.clone(),
                    result: Some(result),
                    error: None,
                },
                Err(err) => {
                    warn!(item = %item.name, error = %err, "Failed to price batch item");
                    BatchEntry {
                        name: item.name.clone(),
                        result: None,
                        error: Some(err),
                    }
                }
            };
            entries.push(entry);
        }

        let failed = entries.iter().filter(|e| e.error.is_some()).count();
        let succeeded = entries.len() - failed;

        info!(items = entries.len(), succeeded, failed, "Batch priced");

        BatchResponse {
            entries,
            succeeded,
            failed,
        }
    }

    async fn state_tax_rate(
        &self,
        request: &QuoteRequest,
        material: &MaterialSpec,
    ) -> ApiResult<Percent> {
        let state = normalize_state(request.state.as_deref());
        let source = self.settings.state_tax_policy.resolve_source(
            request.buyer_has_state_registration,
            state.as_deref(),
            material,
        );

        match source {
            StateTaxSource::Fixed(rate) => Ok(rate),
            StateTaxSource::Table(state) => {
                let rate = self.reference.state_tax_rate(&state).await?;
                if rate.is_none() {
                    debug!(state = %state, "State not in ICMS table, using 0%");
                }
                Ok(rate.unwrap_or_else(Percent::zero))
            }
        }
    }
}
