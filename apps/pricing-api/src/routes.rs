//! Router assembly.
//!
//! ```text
//! GET  /health              liveness + database check
//! POST /api/quotes          single quote
//! POST /api/quotes/batch    several sizes, shared context
//! GET  /api/materials
//! GET  /api/taxes
//! GET  /api/state-taxes
//! GET  /api/configuration
//! GET  /api/services
//! ```
//!
//! A panicking handler answers 500 `INTERNAL` instead of dropping the
//! connection.

use std::any::Any as PanicPayload;

use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::handlers::{health, quote, reference};
use crate::AppState;

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/quotes", post(quote::create_quote))
        .route("/quotes/batch", post(quote::create_batch))
        .route("/materials", get(reference::list_materials))
        .route("/taxes", get(reference::list_fixed_taxes))
        .route("/state-taxes", get(reference::list_state_taxes))
        .route("/configuration", get(reference::get_configuration))
        .route("/services", get(reference::list_services));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Turns a handler panic into an `INTERNAL` error body.
fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "Handler panicked");

    ApiError::internal("Internal error").into_response()
}

/// CORS for the configured origins; `*` (or nothing usable) allows any.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(parsed))
    }
}
