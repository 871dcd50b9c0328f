//! # Reference Data Provider
//!
//! The read-only seam between quoting and storage.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            Arc<dyn ReferenceData>  (injected at startup)                │
//! │                       │                                                 │
//! │          ┌────────────┴─────────────┐                                   │
//! │          ▼                          ▼                                   │
//! │     Database (SQLite)       StaticReferenceData (in memory)             │
//! │     production              tests, demos, JSON fixtures                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bobina_core::tax::applicable_fixed_taxes;
use bobina_core::{
    Configuration, MaterialRef, MaterialSpec, Percent, ServiceLineItem, StateTaxRate, TaxComponent,
};

use crate::error::{DbError, DbResult};
use crate::pool::Database;

/// Read access to everything a quote depends on.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    /// Resolves a material; `DbError::NotFound` when it doesn't exist.
    async fn material(&self, reference: &MaterialRef) -> DbResult<MaterialSpec>;

    /// All materials, ordered by name.
    async fn materials(&self) -> DbResult<Vec<MaterialSpec>>;

    /// Fixed taxes in canonical order, ICMS excluded.
    async fn fixed_taxes(&self) -> DbResult<Vec<TaxComponent>>;

    /// ICMS rate for a state, `None` when the state is unknown.
    async fn state_tax_rate(&self, state: &str) -> DbResult<Option<Percent>>;

    /// The whole ICMS table.
    async fn state_tax_table(&self) -> DbResult<Vec<StateTaxRate>>;

    /// Pricing defaults; see [`ConfigurationRepository::load`](crate::repository::configuration::ConfigurationRepository::load).
    async fn configuration(&self, strict: bool) -> DbResult<Configuration>;

    /// The service catalogue.
    async fn services(&self) -> DbResult<Vec<ServiceLineItem>>;

    /// Whether the backing store answers.
    async fn is_healthy(&self) -> bool {
        true
    }
}

// =============================================================================
// SQLite
// =============================================================================

#[async_trait]
impl ReferenceData for Database {
    async fn material(&self, reference: &MaterialRef) -> DbResult<MaterialSpec> {
        self.materials().find(reference).await
    }

    async fn materials(&self) -> DbResult<Vec<MaterialSpec>> {
        Database::materials(self).list().await
    }

    async fn fixed_taxes(&self) -> DbResult<Vec<TaxComponent>> {
        Database::fixed_taxes(self).applicable().await
    }

    async fn state_tax_rate(&self, state: &str) -> DbResult<Option<Percent>> {
        self.state_taxes().rate_for(state).await
    }

    async fn state_tax_table(&self) -> DbResult<Vec<StateTaxRate>> {
        self.state_taxes().list().await
    }

    async fn configuration(&self, strict: bool) -> DbResult<Configuration> {
        Database::configuration(self).load(strict).await
    }

    async fn services(&self) -> DbResult<Vec<ServiceLineItem>> {
        Database::services(self).list().await
    }

    async fn is_healthy(&self) -> bool {
        self.health_check().await
    }
}

// =============================================================================
// In Memory
// =============================================================================

/// Reference data held in memory.
///
/// ## Usage
/// ```rust,ignore
/// let data = StaticReferenceData::default()
///     .with_material(material)
///     .with_fixed_tax(TaxComponent::new("PIS", Percent::new(dec!(1.65))));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticReferenceData {
    pub materials: Vec<MaterialSpec>,
    pub fixed_taxes: Vec<TaxComponent>,
    pub state_taxes: Vec<StateTaxRate>,
    /// `None` behaves like a missing configuration row.
    pub configuration: Option<Configuration>,
    pub services: Vec<ServiceLineItem>,
}

impl StaticReferenceData {
    /// Parses a JSON fixture with the same shape as this struct.
    pub fn from_json(json: &str) -> DbResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DbError::invalid_data("fixture", "json", e.to_string()))
    }

    pub fn with_material(mut self, material: MaterialSpec) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_fixed_tax(mut self, tax: TaxComponent) -> Self {
        self.fixed_taxes.push(tax);
        self
    }

    pub fn with_state_taxes(mut self, table: Vec<StateTaxRate>) -> Self {
        self.state_taxes = table;
        self
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_service(mut self, service: ServiceLineItem) -> Self {
        self.services.push(service);
        self
    }
}

#[async_trait]
impl ReferenceData for StaticReferenceData {
    async fn material(&self, reference: &MaterialRef) -> DbResult<MaterialSpec> {
        self.materials
            .iter()
            .find(|m| match reference {
                MaterialRef::Id(id) => m.id == *id,
                MaterialRef::Name(name) => m.name == name.trim(),
            })
            .cloned()
            .ok_or_else(|| DbError::not_found("Material", reference.to_string()))
    }

    async fn materials(&self) -> DbResult<Vec<MaterialSpec>> {
        let mut materials = self.materials.clone();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(materials)
    }

    async fn fixed_taxes(&self) -> DbResult<Vec<TaxComponent>> {
        Ok(applicable_fixed_taxes(&self.fixed_taxes))
    }

    async fn state_tax_rate(&self, state: &str) -> DbResult<Option<Percent>> {
        let state = state.trim();
        Ok(self
            .state_taxes
            .iter()
            .find(|row| row.state.eq_ignore_ascii_case(state))
            .map(|row| row.rate))
    }

    async fn state_tax_table(&self) -> DbResult<Vec<StateTaxRate>> {
        let mut table = self.state_taxes.clone();
        table.sort_by(|a, b| a.state.cmp(&b.state));
        Ok(table)
    }

    async fn configuration(&self, strict: bool) -> DbResult<Configuration> {
        match &self.configuration {
            Some(configuration) => Ok(configuration.clone()),
            None if strict => Err(DbError::ConfigurationMissing),
            None => Ok(Configuration::default()),
        }
    }

    async fn services(&self) -> DbResult<Vec<ServiceLineItem>> {
        Ok(self.services.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
