//! Lenient decimal input: clients send money and rates as JSON numbers or strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(serde_json::Number),
    Text(String),
}

/// `null`, a blank string or a missing field become `None`.
pub(crate) fn optional<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<RawDecimal>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawDecimal::Number(n)) => n.to_string(),
        Some(RawDecimal::Text(s)) => s.trim().to_string(),
    };
    if raw.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(Some)
        .map_err(|_| de::Error::custom(format!("invalid decimal: {raw}")))
}
