use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use bobina_core::{BatchRequest, QuoteRequest, QuoteResult};

use crate::error::ApiResult;
use crate::services::BatchResponse;
use crate::AppState;

/// `POST /api/quotes`
pub async fn create_quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> ApiResult<Json<QuoteResult>> {
    let Json(request) = payload?;
    let result = state.quotes.quote(&request).await?;
    Ok(Json(result))
}

/// `POST /api/quotes/batch`
///
/// Per-item failures are reported inside the response; only a malformed
/// body fails the whole call.
pub async fn create_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<Json<BatchResponse>> {
    let Json(batch) = payload?;
    Ok(Json(state.quotes.quote_batch(&batch).await))
}
