//! # Repository Module
//!
//! Reference data repositories.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  QuoteService (pricing-api)                                            │
//! │       │                                                                 │
//! │       │  db.materials().find(&MaterialRef::Id(3))                       │
//! │       ▼                                                                 │
//! │  MaterialRepository                                                    │
//! │  ├── sqlx::query_as::<_, MaterialRow>(...)                              │
//! │  └── MaterialRow::into_domain() ← normalized once, here                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Rows are typed structs with optional columns; nothing above this      │
//! │  layer ever sees a NULL or a REAL.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MaterialRepository`](material::MaterialRepository) - Fabric grades
//! - [`FixedTaxRepository`](tax::FixedTaxRepository) - Fixed taxes
//! - [`StateTaxRepository`](state_tax::StateTaxRepository) - ICMS table
//! - [`ConfigurationRepository`](configuration::ConfigurationRepository) - Pricing defaults
//! - [`ServiceRepository`](service::ServiceRepository) - Service catalogue

pub mod configuration;
pub mod material;
pub mod service;
pub mod state_tax;
pub mod tax;
