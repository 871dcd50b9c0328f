//! # Service Repository
//!
//! The catalogue of extra services offered with a quote. Quotes carry
//! their own service lines; the catalogue only feeds the client's picker.

use sqlx::SqlitePool;
use tracing::debug;

use bobina_core::{Money, Percent, ServiceLineItem};

use crate::convert;
use crate::error::DbResult;

const TABLE: &str = "services";

#[derive(Debug, Clone, sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    name: String,
    unit_price: f64,
    tax_rate: f64,
}

impl ServiceRow {
    fn into_domain(self) -> DbResult<ServiceLineItem> {
        Ok(ServiceLineItem {
            id: Some(self.id),
            unit_price: convert::money(TABLE, "unit_price", self.unit_price)?,
            tax_rate: convert::percent(TABLE, "tax_rate", self.tax_rate)?,
            name: self.name,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ServiceRepository { pool }
    }

    /// All services, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<ServiceLineItem>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, name, unit_price, tax_rate FROM services ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed services");
        rows.into_iter().map(ServiceRow::into_domain).collect()
    }

    /// Inserts a service, returning its id.
    pub async fn insert(&self, name: &str, unit_price: Money, tax_rate: Percent) -> DbResult<i64> {
        let result = sqlx::query("INSERT INTO services (name, unit_price, tax_rate) VALUES (?1, ?2, ?3)")
            .bind(name.trim())
            .bind(convert::money_to_f64(unit_price))
            .bind(convert::percent_to_f64(tax_rate))
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use bobina_core::{Money, Percent};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_insert_and_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.services();

        let id = repo
            .insert("Silk 1 cor", Money::new(dec!(0.2)), Percent::new(dec!(5)))
            .await
            .unwrap();
        repo.insert("Alça", Money::new(dec!(0.1)), Percent::zero())
            .await
            .unwrap();

        let services = repo.list().await.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "Alça");
        assert_eq!(services[1].id, Some(id));
        assert_eq!(services[1].unit_price_with_tax().amount(), dec!(0.21));
    }
}
