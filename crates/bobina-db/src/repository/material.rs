//! # Material Repository
//!
//! Reads fabric grades ("gramaturas").
//!
//! ## Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  materials row                         MaterialSpec                     │
//! │  ─────────────                         ────────────                     │
//! │  cost_per_cm     REAL        ──►       Money                            │
//! │  roll_height_cm  REAL | NULL ──►       Option<Decimal>  (≤ 0 → None)    │
//! │  state_tax_rate  REAL | NULL ──►       Option<Percent>                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use bobina_core::{MaterialRef, MaterialSpec, Money, Percent};

use crate::convert;
use crate::error::{DbError, DbResult};

const TABLE: &str = "materials";

/// A `materials` row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
struct MaterialRow {
    id: i64,
    name: String,
    cost_per_cm: f64,
    roll_height_cm: Option<f64>,
    state_tax_rate: Option<f64>,
}

impl MaterialRow {
    fn into_domain(self) -> DbResult<MaterialSpec> {
        let roll_height = convert::optional_decimal(TABLE, "roll_height_cm", self.roll_height_cm)?;

        let roll_height_cm = match roll_height {
            Some(h) if h <= Decimal::ZERO => {
                warn!(
                    material = %self.name,
                    roll_height_cm = %h,
                    "Ignoring non-positive roll height"
                );
                None
            }
            other => other,
        };

        Ok(MaterialSpec {
            id: self.id,
            cost_per_cm: convert::money(TABLE, "cost_per_cm", self.cost_per_cm)?,
            roll_height_cm,
            state_tax_rate: self
                .state_tax_rate
                .map(|r| convert::percent(TABLE, "state_tax_rate", r))
                .transpose()?,
            name: self.name,
        })
    }
}

/// Repository for material reads.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MaterialRepository::new(pool);
/// let material = repo.find(&MaterialRef::Name("TNT 40g".into())).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    pool: SqlitePool,
}

impl MaterialRepository {
    /// Creates a new MaterialRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaterialRepository { pool }
    }

    /// Lists all materials ordered by name.
    pub async fn list(&self) -> DbResult<Vec<MaterialSpec>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, name, cost_per_cm, roll_height_cm, state_tax_rate
            FROM materials
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed materials");
        rows.into_iter().map(MaterialRow::into_domain).collect()
    }

    /// Gets a material by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<MaterialSpec>> {
        let row = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, name, cost_per_cm, roll_height_cm, state_tax_rate
            FROM materials
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MaterialRow::into_domain).transpose()
    }

    /// Gets a material by its exact (trimmed) name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<MaterialSpec>> {
        let row = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, name, cost_per_cm, roll_height_cm, state_tax_rate
            FROM materials
            WHERE name = ?1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MaterialRow::into_domain).transpose()
    }

    /// Resolves a material reference.
    ///
    /// ## Errors
    /// `DbError::NotFound` when nothing matches.
    pub async fn find(&self, reference: &MaterialRef) -> DbResult<MaterialSpec> {
        debug!(reference = %reference, "Resolving material");

        let material = match reference {
            MaterialRef::Id(id) => self.get_by_id(*id).await?,
            MaterialRef::Name(name) => self.get_by_name(name).await?,
        };

        material.ok_or_else(|| DbError::not_found("Material", reference.to_string()))
    }

    /// Inserts a material, returning its id.
    pub async fn insert(
        &self,
        name: &str,
        cost_per_cm: Money,
        roll_height_cm: Option<Decimal>,
        state_tax_rate: Option<Percent>,
    ) -> DbResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO materials (name, cost_per_cm, roll_height_cm, state_tax_rate)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(name.trim())
        .bind(convert::money_to_f64(cost_per_cm))
        .bind(roll_height_cm.map(convert::decimal_to_f64))
        .bind(state_tax_rate.map(convert::percent_to_f64))
        .execute(&self.pool)
        .await?;

        debug!(name = %name, id = result.last_insert_rowid(), "Inserted material");
        Ok(result.last_insert_rowid())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
