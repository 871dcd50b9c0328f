//! REAL ⇄ Decimal conversion for row normalization.
//!
//! SQLite stores rates and prices as `REAL`. Every value is converted once,
//! when a row becomes a domain type; NaN and infinities are rejected.

use bobina_core::{Money, Percent};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::{DbError, DbResult};

pub(crate) fn decimal(table: &str, column: &str, value: f64) -> DbResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| DbError::invalid_data(table, column, format!("{} is not a finite number", value)))
}

pub(crate) fn optional_decimal(table: &str, column: &str, value: Option<f64>) -> DbResult<Option<Decimal>> {
    value.map(|v| decimal(table, column, v)).transpose()
}

pub(crate) fn money(table: &str, column: &str, value: f64) -> DbResult<Money> {
    decimal(table, column, value).map(Money::new)
}

pub(crate) fn percent(table: &str, column: &str, value: f64) -> DbResult<Percent> {
    decimal(table, column, value).map(Percent::new)
}

pub(crate) fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub(crate) fn money_to_f64(value: Money) -> f64 {
    decimal_to_f64(value.amount())
}

pub(crate) fn percent_to_f64(value: Percent) -> f64 {
    decimal_to_f64(value.value())
}
