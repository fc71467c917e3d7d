//! Lenient date input: an unset HTML date field arrives as an empty string.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer};

/// `null`, a blank string or a missing field become `None`.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (the date part is kept).
pub(crate) fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| de::Error::custom(format!("invalid date: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Field {
        #[serde(default, deserialize_with = "optional")]
        value: Option<NaiveDate>,
    }

    fn parse(json: serde_json::Value) -> Result<Option<NaiveDate>, serde_json::Error> {
        serde_json::from_value::<Field>(json).map(|p| p.value)
    }

    #[test]
    fn accepts_dates_and_timestamps() {
        let july_first = NaiveDate::from_ymd_opt(2026, 7, 1);
        assert_eq!(
            parse(serde_json::json!({"value": "2026-07-01"})).unwrap(),
            july_first
        );
        assert_eq!(
            parse(serde_json::json!({"value": "2026-07-01T09:30:00Z"})).unwrap(),
            july_first
        );
    }

    #[test]
    fn blank_and_missing_are_none() {
        assert_eq!(parse(serde_json::json!({"value": ""})).unwrap(), None);
        assert_eq!(parse(serde_json::json!({"value": "  "})).unwrap(), None);
        assert_eq!(parse(serde_json::json!({"value": null})).unwrap(), None);
        assert_eq!(parse(serde_json::json!({})).unwrap(), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse(serde_json::json!({"value": "next friday"})).is_err());
    }
}
