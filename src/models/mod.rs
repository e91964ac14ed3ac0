use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An instant on the price timeline. Everything is normalised to UTC.
pub type Timestamp = DateTime<Utc>;

// ── Raw JSON rows ─────────────────────────────────────────────────────────────

/// `/api/data/merged_oil_price_history` row: Date, Price, event_type
///
/// Fields stay untyped so one bad cell never sinks the whole array.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawRecord {
    #[serde(rename = "Date", default)]
    pub date: Option<serde_json::Value>,
    #[serde(rename = "Price", default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub event_type: Option<serde_json::Value>,
}

/// `/api/data/forecast` row: Date, PredictedPrice
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawForecastRecord {
    #[serde(rename = "Date", default)]
    pub date: Option<serde_json::Value>,
    #[serde(rename = "PredictedPrice", default)]
    pub predicted_price: Option<serde_json::Value>,
}

// ── Validated series ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatedRecord {
    pub date: Timestamp,
    /// `None` when the row carried no usable number; the row itself is kept.
    pub price: Option<f64>,
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastRecord {
    pub date: Timestamp,
    pub predicted_price: Option<f64>,
}

// ── Filter selection ──────────────────────────────────────────────────────────

/// Inclusive date range; a missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl DateRange {
    pub fn new(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, ts: &Timestamp) -> bool {
        self.start.is_none_or(|s| *ts >= s) && self.end.is_none_or(|e| *ts <= e)
    }
}

/// Name of the catch-all entry in the event dropdown.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Event(String),
}

impl Category {
    /// `"all"` is reserved; anything else names an event type.
    pub fn parse(s: &str) -> Self {
        if s == ALL_CATEGORIES {
            Category::All
        } else {
            Category::Event(s.to_string())
        }
    }

    pub fn matches(&self, event_type: Option<&str>) -> bool {
        match self {
            Category::All => true,
            Category::Event(name) => event_type == Some(name.as_str()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str(ALL_CATEGORIES),
            Category::Event(name) => f.write_str(name),
        }
    }
}

/// The user's current range + category choice. Default restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub date_range: DateRange,
    pub category: Category,
}

impl FilterSelection {
    pub fn new(date_range: DateRange, category: Category) -> Self {
        Self { date_range, category }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.date_range.is_unbounded() && self.category == Category::All
    }
}

// ── Chart output ──────────────────────────────────────────────────────────────

/// A chart coordinate. `x` is epoch milliseconds, the numeric form chart
/// primitives consume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DisplayPoint {
    pub x: i64,
    pub y: f64,
}

/// Static accuracy figures shown beside the forecast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelMetrics {
    pub rmse: f64,
    pub mae: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_category_parse_reserves_all() {
        assert_eq!(Category::parse("all"), Category::All);
        assert_eq!(Category::parse("OPEC"), Category::Event("OPEC".into()));
        assert_eq!(Category::parse("All"), Category::Event("All".into()));
        assert_eq!(Category::parse("OPEC").to_string(), "OPEC");
        assert_eq!(Category::All.to_string(), "all");
    }

    #[test]
    fn test_category_matches() {
        assert!(Category::All.matches(None));
        assert!(Category::All.matches(Some("COVID")));
        assert!(Category::parse("COVID").matches(Some("COVID")));
        assert!(!Category::parse("COVID").matches(Some("OPEC")));
        assert!(!Category::parse("COVID").matches(None));
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let range = DateRange::new(Some(day(2020, 3, 1)), Some(day(2020, 12, 31)));
        assert!(range.contains(&day(2020, 3, 1)));
        assert!(range.contains(&day(2020, 12, 31)));
        assert!(!range.contains(&day(2020, 2, 29)));
        assert!(!range.contains(&day(2021, 1, 1)));
        assert!(DateRange::default().contains(&day(1987, 5, 20)));
    }

    #[test]
    fn test_default_selection_is_unrestricted() {
        assert!(FilterSelection::default().is_unrestricted());
        let sel = FilterSelection::new(DateRange::default(), Category::parse("OPEC"));
        assert!(!sel.is_unrestricted());
    }
}
