//! Validating parse boundary: raw JSON rows → typed records.
//!
//! A row whose `Date` does not parse as ISO-8601 is dropped outright. Nothing
//! downstream ever sees a placeholder date.

use crate::models::{ForecastRecord, RawForecastRecord, RawRecord, Timestamp, ValidatedRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

// ── Field parsers ─────────────────────────────────────────────────────────────

/// Parse an ISO-8601 instant.
/// "2020-01-01T12:00:00+02:00" → 10:00Z | "2020-06-01" → midnight UTC | "2020" → Jan 1
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return midnight(d);
    }

    // Reduced precision: YYYY-MM and YYYY
    let mut parts = s.split('-');
    let year = parse_fixed_digits(parts.next()?, 4)?;
    let month = match parts.next() {
        Some(m) => parse_fixed_digits(m, 2)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    midnight(NaiveDate::from_ymd_opt(year as i32, month, 1)?)
}

fn parse_fixed_digits(s: &str, width: usize) -> Option<u32> {
    if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn midnight(d: NaiveDate) -> Option<Timestamp> {
    d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

fn value_as_timestamp(v: Option<&Value>) -> Option<Timestamp> {
    v?.as_str().and_then(parse_timestamp)
}

/// Numbers pass through; numeric strings ("60.5") are read as numbers.
/// Anything else carries no value but never costs the row.
fn value_as_price(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|p| p.is_finite())
}

/// Only real strings name a category; null, NaN and numbers coalesce to None.
fn value_as_event_type(v: Option<&Value>) -> Option<String> {
    v?.as_str().map(str::to_string)
}

// ── Raw → validated ───────────────────────────────────────────────────────────

pub fn raw_to_record(raw: &RawRecord) -> Option<ValidatedRecord> {
    let date = value_as_timestamp(raw.date.as_ref())?;

    Some(ValidatedRecord {
        date,
        price: value_as_price(raw.price.as_ref()),
        event_type: value_as_event_type(raw.event_type.as_ref()),
    })
}

pub fn raw_to_forecast(raw: &RawForecastRecord) -> Option<ForecastRecord> {
    let date = value_as_timestamp(raw.date.as_ref())?;

    Some(ForecastRecord {
        date,
        predicted_price: value_as_price(raw.predicted_price.as_ref()),
    })
}

/// Validate a history batch, keeping source order.
pub fn parse_records(raw: &[RawRecord]) -> Vec<ValidatedRecord> {
    let records: Vec<ValidatedRecord> = raw.iter().filter_map(raw_to_record).collect();
    debug!(
        "History parse: {} kept, {} dropped",
        records.len(),
        raw.len() - records.len()
    );
    records
}

/// Validate a forecast batch with the same date rule as history.
pub fn parse_forecast(raw: &[RawForecastRecord]) -> Vec<ForecastRecord> {
    let records: Vec<ForecastRecord> = raw.iter().filter_map(raw_to_forecast).collect();
    debug!(
        "Forecast parse: {} kept, {} dropped",
        records.len(),
        raw.len() - records.len()
    );
    records
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn raw(date: Value, price: Value, event_type: Option<Value>) -> RawRecord {
        RawRecord {
            date: Some(date),
            price: Some(price),
            event_type,
        }
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let jan1 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2020-01-01"), Some(jan1));
        assert_eq!(parse_timestamp(" 2020-01-01 "), Some(jan1));
        assert_eq!(parse_timestamp("2020-01"), Some(jan1));
        assert_eq!(parse_timestamp("2020"), Some(jan1));
        assert_eq!(parse_timestamp("2020-01-01T00:00:00"), Some(jan1));
        assert_eq!(parse_timestamp("2020-01-01 00:00:00.000"), Some(jan1));
        assert_eq!(parse_timestamp("2020-01-01T02:00:00+02:00"), Some(jan1));
        assert_eq!(parse_timestamp("2020-01-01T00:00:00Z"), Some(jan1));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        for s in ["", "bad-date", "20-May-87", "2020-13-01", "2020-02-30", "202", "2020-1", "2020-01-01-01"] {
            assert_eq!(parse_timestamp(s), None, "{s:?} should not parse");
        }
    }

    #[test]
    fn test_parse_records_drops_bad_dates_and_keeps_order() {
        let input = vec![
            raw(json!("2020-01-01"), json!(50), Some(json!("OPEC"))),
            raw(json!("2020-06-01"), json!(60), Some(json!("COVID"))),
            raw(json!("bad-date"), json!(99), Some(json!("X"))),
        ];
        let out = parse_records(&input);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].price, Some(50.0));
        assert_eq!(out[0].event_type.as_deref(), Some("OPEC"));
        assert_eq!(out[1].price, Some(60.0));
        assert_eq!(out[1].event_type.as_deref(), Some("COVID"));
        // input untouched
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_parse_records_coalesces_event_type() {
        let input = vec![
            raw(json!("2020-01-01"), json!(50.5), None),
            raw(json!("2020-01-02"), json!(51.0), Some(Value::Null)),
            raw(json!("2020-01-03"), json!(52.0), Some(json!(7))),
        ];
        let out = parse_records(&input);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.event_type.is_none()));
    }

    #[test]
    fn test_parse_records_requires_date_string() {
        let input = vec![raw(json!(20200101), json!(50), None), RawRecord::default()];
        assert!(parse_records(&input).is_empty());
    }

    #[test]
    fn test_parse_records_keeps_rows_without_numeric_price() {
        let rows: Vec<RawRecord> = serde_json::from_value(json!([
            {"Date": "2020-01-01", "Price": null, "event_type": "OPEC"},
            {"Date": "2020-06-01", "Price": "60.5", "event_type": "COVID"},
            {"Date": "2020-07-01", "event_type": "War"},
            {"Date": "2020-08-01", "Price": "n/a", "event_type": "War"}
        ]))
        .unwrap();
        let out = parse_records(&rows);

        assert_eq!(out.len(), 4);
        let prices: Vec<Option<f64>> = out.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![None, Some(60.5), None, None]);
        assert_eq!(
            crate::vocabulary::event_vocabulary(&out),
            vec!["all", "OPEC", "COVID", "War"]
        );
    }

    #[test]
    fn test_raw_record_deserializes_loose_json() {
        let body = r#"[
            {"Date": "2020-01-01", "Price": 50, "event_type": "OPEC", "Extra": 1},
            {"Date": null, "Price": 60},
            {}
        ]"#;
        let rows: Vec<RawRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(parse_records(&rows).len(), 1);
    }

    #[test]
    fn test_parse_forecast_uses_same_date_rule() {
        let rows: Vec<RawForecastRecord> = serde_json::from_value(json!([
            {"Date": "2024-01-01", "PredictedPrice": 80.25},
            {"Date": "not a date", "PredictedPrice": 81.0},
            {"Date": "2024-02", "PredictedPrice": 79.5},
            {"Date": "2024-03-01", "PredictedPrice": null}
        ]))
        .unwrap();
        let out = parse_forecast(&rows);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].predicted_price, Some(80.25));
        assert_eq!(out[1].date, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(out[2].predicted_price, None);
    }
}
