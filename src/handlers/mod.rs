pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod staff;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

/// Distinguishes an absent field from an explicit `null` in PATCH-style
/// bodies: absent stays `None`, `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Decimal fields travel as JSON strings to avoid floating-point issues.
pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(value)
        .map_err(|_| AppError::BadRequest(format!("Invalid {field}: {value}")))
}

pub(crate) fn default_limit() -> i64 {
    20
}

pub(crate) fn clamp_page(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, 100), offset.max(0))
}
