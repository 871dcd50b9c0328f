//! Read-only views of the reference data, for populating client forms.

use axum::extract::State;
use axum::Json;

use bobina_core::tax::applicable_fixed_taxes;
use bobina_core::{Configuration, MaterialSpec, ServiceLineItem, StateTaxRate, TaxComponent};

use crate::error::ApiResult;
use crate::AppState;

/// `GET /api/materials`
pub async fn list_materials(State(state): State<AppState>) -> ApiResult<Json<Vec<MaterialSpec>>> {
    Ok(Json(state.reference.materials().await?))
}

/// `GET /api/taxes`, ICMS excluded, canonical order.
pub async fn list_fixed_taxes(State(state): State<AppState>) -> ApiResult<Json<Vec<TaxComponent>>> {
    let taxes = state.reference.fixed_taxes().await?;
    Ok(Json(applicable_fixed_taxes(&taxes)))
}

/// `GET /api/state-taxes`
pub async fn list_state_taxes(State(state): State<AppState>) -> ApiResult<Json<Vec<StateTaxRate>>> {
    Ok(Json(state.reference.state_tax_table().await?))
}

/// `GET /api/configuration`
pub async fn get_configuration(State(state): State<AppState>) -> ApiResult<Json<Configuration>> {
    let strict = state.quotes.settings().strict_configuration;
    Ok(Json(state.reference.configuration(strict).await?))
}

/// `GET /api/services`
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Json<Vec<ServiceLineItem>>> {
    Ok(Json(state.reference.services().await?))
}
