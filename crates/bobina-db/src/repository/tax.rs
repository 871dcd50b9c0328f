//! # Fixed Tax Repository
//!
//! Reads the taxes charged on every price (PIS, COFINS, ...).
//!
//! The table may also hold an ICMS row left over from older setups; it is
//! returned by [`FixedTaxRepository::list`] but never by
//! [`FixedTaxRepository::applicable`].

use sqlx::SqlitePool;
use tracing::debug;

use bobina_core::tax::applicable_fixed_taxes;
use bobina_core::{Percent, TaxComponent};

use crate::convert;
use crate::error::DbResult;

const TABLE: &str = "fixed_taxes";

#[derive(Debug, Clone, sqlx::FromRow)]
struct FixedTaxRow {
    name: String,
    rate: f64,
}

impl FixedTaxRow {
    fn into_domain(self) -> DbResult<TaxComponent> {
        Ok(TaxComponent {
            rate: convert::percent(TABLE, "rate", self.rate)?,
            name: self.name,
        })
    }
}

/// Repository for fixed tax reads.
#[derive(Debug, Clone)]
pub struct FixedTaxRepository {
    pool: SqlitePool,
}

impl FixedTaxRepository {
    pub fn new(pool: SqlitePool) -> Self {
        FixedTaxRepository { pool }
    }

    /// Every stored row, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<TaxComponent>> {
        let rows = sqlx::query_as::<_, FixedTaxRow>("SELECT name, rate FROM fixed_taxes ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed fixed taxes");
        rows.into_iter().map(FixedTaxRow::into_domain).collect()
    }

    /// Taxes that enter the price: ICMS removed, canonical order.
    pub async fn applicable(&self) -> DbResult<Vec<TaxComponent>> {
        Ok(applicable_fixed_taxes(&self.list().await?))
    }

    /// Inserts or updates a tax rate by name.
    pub async fn upsert(&self, name: &str, rate: Percent) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO fixed_taxes (name, rate) VALUES (?1, ?2)
            ON CONFLICT(name) DO UPDATE SET rate = excluded.rate
            "#,
        )
        .bind(name.trim())
        .bind(convert::percent_to_f64(rate))
        .execute(&self.pool)
        .await?;

        debug!(name = %name, rate = %rate, "Upserted fixed tax");
        Ok(())
    }
}
