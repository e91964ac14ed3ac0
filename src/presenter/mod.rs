//! Series → chart-ready points and labels.
//!
//! Labels are re-derived from the numeric `x` at render time. An `x` that no
//! longer maps to a 4-digit-year instant renders as an empty label.

pub mod surface;

use crate::forecast::ForecastSeries;
use crate::models::{DisplayPoint, ForecastRecord, Timestamp, ValidatedRecord};
use chrono::{DateTime, Datelike, Utc};

/// Anything that can sit on the price/time plane.
pub trait Plottable {
    fn instant(&self) -> Timestamp;
    /// `None` for rows that carried no usable number.
    fn value(&self) -> Option<f64>;
}

impl Plottable for ValidatedRecord {
    fn instant(&self) -> Timestamp {
        self.date
    }
    fn value(&self) -> Option<f64> {
        self.price
    }
}

impl Plottable for ForecastRecord {
    fn instant(&self) -> Timestamp {
        self.date
    }
    fn value(&self) -> Option<f64> {
        self.predicted_price
    }
}

/// A titled run of points handed to a [`surface::ChartSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub points: Vec<DisplayPoint>,
}

impl ChartSeries {
    pub fn new(title: impl Into<String>, points: Vec<DisplayPoint>) -> Self {
        Self {
            title: title.into(),
            points,
        }
    }
}

/// One point per record with a value. Valueless rows leave a gap.
pub fn present<T: Plottable>(records: &[T]) -> Vec<DisplayPoint> {
    records
        .iter()
        .filter_map(|r| {
            Some(DisplayPoint {
                x: r.instant().timestamp_millis(),
                y: r.value()?,
            })
        })
        .collect()
}

pub fn present_history(records: &[ValidatedRecord]) -> ChartSeries {
    ChartSeries::new("Historical Brent Oil Prices", present(records))
}

pub fn present_forecast(series: &ForecastSeries) -> ChartSeries {
    ChartSeries::new("Forecast Brent Oil Prices", present(series.records()))
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Final validity check: representable instant with a 4-digit year.
fn instant_at(x: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(x).filter(|dt| (0..=9999).contains(&dt.year()))
}

/// X-axis tick: "2020", or "" when `x` is not a valid instant.
pub fn tick_label(x: i64) -> String {
    instant_at(x)
        .map(|dt| dt.format("%Y").to_string())
        .unwrap_or_default()
}

/// Tooltip: "Date: 2020-06-01", or "" when `x` is not a valid instant.
pub fn tooltip_label(x: i64) -> String {
    instant_at(x)
        .map(|dt| format!("Date: {}", dt.format("%Y-%m-%d")))
        .unwrap_or_default()
}

/// One tick per calendar year, at the first point falling in that year.
pub fn year_ticks(points: &[DisplayPoint]) -> Vec<(i64, String)> {
    let mut ticks: Vec<(i64, String)> = Vec::new();
    for p in points {
        let label = tick_label(p.x);
        if label.is_empty() || ticks.iter().any(|(_, l)| *l == label) {
            continue;
        }
        ticks.push((p.x, label));
    }
    ticks
}

/// Min/max of the finite y values; `None` for an empty series.
pub fn y_domain(points: &[DisplayPoint]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points.iter().filter(|p| p.y.is_finite()) {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    if min_y.is_finite() && max_y.is_finite() {
        Some((min_y, max_y))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_timestamp;

    fn rec(date: &str, price: f64) -> ValidatedRecord {
        ValidatedRecord {
            date: parse_timestamp(date).unwrap(),
            price: Some(price),
            event_type: None,
        }
    }

    #[test]
    fn test_present_maps_instant_and_value() {
        let points = present(&[rec("2020-06-01", 60.0)]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].y, 60.0);
        assert_eq!(tick_label(points[0].x), "2020");
        assert_eq!(tooltip_label(points[0].x), "Date: 2020-06-01");
    }

    #[test]
    fn test_present_forecast_keeps_every_record() {
        let series = ForecastSeries::new(vec![
            ForecastRecord { date: parse_timestamp("2024-01-01").unwrap(), predicted_price: Some(80.0) },
            ForecastRecord { date: parse_timestamp("2024-02-01").unwrap(), predicted_price: Some(81.0) },
        ]);
        let chart = present_forecast(&series);
        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[1].y, 81.0);
    }

    #[test]
    fn test_present_skips_rows_without_value() {
        let mut gap = rec("2020-02-01", 0.0);
        gap.price = None;
        let points = present(&[rec("2020-01-01", 50.0), gap, rec("2020-03-01", 52.0)]);
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![50.0, 52.0]);

        let forecast = ForecastSeries::new(vec![ForecastRecord {
            date: parse_timestamp("2024-01-01").unwrap(),
            predicted_price: None,
        }]);
        assert!(present_forecast(&forecast).points.is_empty());
    }

    #[test]
    fn test_labels_blank_for_invalid_instants() {
        assert_eq!(tick_label(i64::MAX), "");
        assert_eq!(tooltip_label(i64::MIN), "");
        // year 10000 is representable but not a 4-digit year
        let far = parse_timestamp("9999-12-31").unwrap().timestamp_millis() + 86_400_000;
        assert_eq!(tick_label(far), "");
        assert_eq!(tooltip_label(far), "");
    }

    #[test]
    fn test_year_ticks_first_point_per_year() {
        let points = present(&[
            rec("2019-12-30", 1.0),
            rec("2020-01-02", 2.0),
            rec("2020-05-02", 3.0),
            rec("2021-01-04", 4.0),
        ]);
        let ticks = year_ticks(&points);
        let labels: Vec<&str> = ticks.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["2019", "2020", "2021"]);
        assert_eq!(ticks[1].0, points[1].x);
    }

    #[test]
    fn test_y_domain() {
        assert_eq!(y_domain(&[]), None);
        let points = present(&[rec("2020-01-01", 50.0), rec("2020-02-01", 9.5), rec("2020-03-01", 70.25)]);
        assert_eq!(y_domain(&points), Some((9.5, 70.25)));
    }
}
