//! # Bobina Pricing API
//!
//! HTTP service that prices nonwoven bags cut from fabric rolls.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Pricing API                                     │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  handlers      │  │  QuoteService  │  │  bobina-core               ││
//! │  │                │  │                │  │                            ││
//! │  │ • quotes       │─►│ • quote        │─►│ • compute_quote            ││
//! │  │ • quotes/batch │  │ • quote_batch  │  │ • solver / yield / taxes   ││
//! │  │ • reference    │  │                │  │                            ││
//! │  │ • health       │  └───────┬────────┘  └────────────────────────────┘│
//! │  └────────────────┘          │                                          │
//! │                              ▼                                          │
//! │                   ┌─────────────────────┐                              │
//! │                   │ dyn ReferenceData   │  bobina-db (SQLite)          │
//! │                   └─────────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is honoured):
//! - `HTTP_HOST` - Bind interface (default: 0.0.0.0)
//! - `HTTP_PORT` - HTTP port (default: 5000)
//! - `DATABASE_PATH` - SQLite file (default: ./data/bobina.db)
//! - `CORS_ORIGINS` - Comma-separated origins, `*` for any (default: *)
//! - `STRICT_CONFIGURATION` - Fail when the configuration row is missing (default: false)
//! - `REGISTERED_BUYER_POLICY` - `material_rate` or `interstate` (default: material_rate)
//! - `INTERSTATE_RATE` - Flat ICMS for the interstate policy (default: 4)
//! - `ORIGIN_STATE` - Seller's state for the interstate policy (default: SP)
//! - `LOG_LEVEL` - Filter used when `RUST_LOG` is unset (default: info)

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

use std::sync::Arc;

use bobina_db::ReferenceData;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::{build_router, cors_layer};
pub use services::{QuoteService, QuoteSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub reference: Arc<dyn ReferenceData>,
    pub quotes: QuoteService,
}

impl AppState {
    pub fn new(reference: Arc<dyn ReferenceData>, settings: QuoteSettings) -> Self {
        Self {
            quotes: QuoteService::new(Arc::clone(&reference), settings),
            reference,
        }
    }
}

impl From<&ApiConfig> for QuoteSettings {
    fn from(config: &ApiConfig) -> Self {
        QuoteSettings {
            strict_configuration: config.strict_configuration,
            state_tax_policy: config.state_tax_policy.clone(),
        }
    }
}
