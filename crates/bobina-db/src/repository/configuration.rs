//! # Configuration Repository
//!
//! The single row of pricing defaults.
//!
//! ## Missing Data Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  row present, some columns NULL  ──►  NULL columns become 0             │
//! │  row absent, strict = false      ──►  Configuration::default() + warn   │
//! │  row absent, strict = true       ──►  DbError::ConfigurationMissing     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use bobina_core::{Configuration, Money, Percent};

use crate::convert;
use crate::error::{DbError, DbResult};

const TABLE: &str = "configuration";

#[derive(Debug, Clone, sqlx::FromRow)]
struct ConfigurationRow {
    margin: Option<f64>,
    other_costs: Option<f64>,
    calibration_loss_units: Option<i64>,
    service_unit_price: Option<f64>,
    handle_size_cm: Option<f64>,
}

impl ConfigurationRow {
    fn into_domain(self) -> DbResult<Configuration> {
        let or_zero = |column: &str, value: Option<f64>| -> DbResult<Decimal> {
            Ok(convert::optional_decimal(TABLE, column, value)?.unwrap_or(Decimal::ZERO))
        };

        Ok(Configuration {
            margin: Percent::new(or_zero("margin", self.margin)?),
            other_costs: Percent::new(or_zero("other_costs", self.other_costs)?),
            calibration_loss_units: self.calibration_loss_units.unwrap_or(0),
            service_unit_price: Money::new(or_zero("service_unit_price", self.service_unit_price)?),
            handle_size_cm: or_zero("handle_size_cm", self.handle_size_cm)?,
        })
    }
}

/// Repository for the configuration row.
#[derive(Debug, Clone)]
pub struct ConfigurationRepository {
    pool: SqlitePool,
}

impl ConfigurationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ConfigurationRepository { pool }
    }

    /// The stored configuration, `None` when the row does not exist.
    pub async fn get(&self) -> DbResult<Option<Configuration>> {
        let row = sqlx::query_as::<_, ConfigurationRow>(
            r#"
            SELECT margin, other_costs, calibration_loss_units, service_unit_price, handle_size_cm
            FROM configuration
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(ConfigurationRow::into_domain).transpose()
    }

    /// The configuration with the missing-row fallback applied.
    ///
    /// ## Errors
    /// `DbError::ConfigurationMissing` when the row is absent and `strict`.
    pub async fn load(&self, strict: bool) -> DbResult<Configuration> {
        match self.get().await? {
            Some(configuration) => {
                debug!("Loaded pricing configuration");
                Ok(configuration)
            }
            None if strict => Err(DbError::ConfigurationMissing),
            None => {
                warn!("No pricing configuration row, using zero defaults");
                Ok(Configuration::default())
            }
        }
    }

    /// Writes the configuration row.
    pub async fn save(&self, configuration: &Configuration) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO configuration
                (id, margin, other_costs, calibration_loss_units, service_unit_price, handle_size_cm)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                margin = excluded.margin,
                other_costs = excluded.other_costs,
                calibration_loss_units = excluded.calibration_loss_units,
                service_unit_price = excluded.service_unit_price,
                handle_size_cm = excluded.handle_size_cm
            "#,
        )
        .bind(convert::percent_to_f64(configuration.margin))
        .bind(convert::percent_to_f64(configuration.other_costs))
        .bind(configuration.calibration_loss_units)
        .bind(convert::money_to_f64(configuration.service_unit_price))
        .bind(convert::decimal_to_f64(configuration.handle_size_cm))
        .execute(&self.pool)
        .await?;

        debug!("Saved pricing configuration");
        Ok(())
    }
}
