//! # bobina-db: Reference Data Layer for Bobina
//!
//! This crate provides read access to the pricing reference data:
//! materials, fixed taxes, the ICMS table, configuration and services.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bobina Data Flow                                 │
//! │                                                                         │
//! │  POST /api/quotes ──► QuoteService                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bobina-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ ReferenceData │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │ (provider.rs) │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ MaterialRepo  │    │              │  │   │
//! │  │   │ Database ─────┼───►│ FixedTaxRepo  │    │ 001_reference│  │   │
//! │  │   │ StaticRef...  │    │ StateTaxRepo  │    │   _data.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (./data/bobina.db)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration and default seeding
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`provider`] - The `ReferenceData` trait and its implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bobina_db::{Database, DbConfig, ReferenceData};
//!
//! let db = Database::new(DbConfig::new("./data/bobina.db")).await?;
//! db.ensure_defaults().await?;
//!
//! let taxes = db.fixed_taxes().applicable().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

mod convert;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod provider;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use provider::{ReferenceData, StaticReferenceData};

// Repository re-exports for convenience
pub use repository::configuration::ConfigurationRepository;
pub use repository::material::MaterialRepository;
pub use repository::service::ServiceRepository;
pub use repository::state_tax::StateTaxRepository;
pub use repository::tax::FixedTaxRepository;
