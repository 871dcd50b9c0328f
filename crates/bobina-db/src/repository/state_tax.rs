//! # State Tax Repository
//!
//! The national ICMS table, one rate per state.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use bobina_core::{Percent, StateTaxRate};

use crate::convert;
use crate::error::DbResult;

const TABLE: &str = "state_tax_rates";

#[derive(Debug, Clone, sqlx::FromRow)]
struct StateTaxRow {
    state: String,
    rate: f64,
}

impl StateTaxRow {
    fn into_domain(self) -> DbResult<StateTaxRate> {
        Ok(StateTaxRate {
            rate: convert::percent(TABLE, "rate", self.rate)?,
            state: self.state,
        })
    }
}

/// Repository for ICMS table reads.
#[derive(Debug, Clone)]
pub struct StateTaxRepository {
    pool: SqlitePool,
}

impl StateTaxRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StateTaxRepository { pool }
    }

    /// The whole table, ordered by state code.
    pub async fn list(&self) -> DbResult<Vec<StateTaxRate>> {
        let rows = sqlx::query_as::<_, StateTaxRow>(
            "SELECT state, rate FROM state_tax_rates ORDER BY state",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StateTaxRow::into_domain).collect()
    }

    /// Rate for one state, `None` when the state is not in the table.
    pub async fn rate_for(&self, state: &str) -> DbResult<Option<Percent>> {
        let state = state.trim().to_ascii_uppercase();

        let row = sqlx::query_as::<_, StateTaxRow>(
            "SELECT state, rate FROM state_tax_rates WHERE state = ?1",
        )
        .bind(&state)
        .fetch_optional(&self.pool)
        .await?;

        debug!(state = %state, found = row.is_some(), "Looked up ICMS rate");
        row.map(|r| r.into_domain().map(|t| t.rate)).transpose()
    }

    /// Inserts or updates a state's rate, stamping `updated_at`.
    pub async fn upsert(&self, state: &str, rate: Percent) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO state_tax_rates (state, rate, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(state) DO UPDATE SET rate = excluded.rate, updated_at = excluded.updated_at
            "#,
        )
        .bind(state.trim().to_ascii_uppercase())
        .bind(convert::percent_to_f64(rate))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
