use std::time::{Duration, Instant};
use tracing::info;

/// Times one dashboard stage and reports how many chart points it produced.
/// The summary is logged when the timer goes out of scope.
pub struct Timer {
    stage: &'static str,
    start: Instant,
    points: usize,
}

impl Timer {
    pub fn start(stage: &'static str) -> Self {
        info!("{}: started", stage);
        Self {
            stage,
            start: Instant::now(),
            points: 0,
        }
    }

    /// Add to the number of points this stage produced.
    pub fn record(&mut self, points: usize) {
        self.points += points;
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn summary(&self) -> String {
        let unit = if self.points == 1 { "point" } else { "points" };
        format!(
            "{}: {} {} in {:.2?}",
            self.stage,
            self.points,
            unit,
            self.elapsed()
        )
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("{}", self.summary());
    }
}

/// Format a price with two decimals and thousands separators.
/// 1234.5 → "1,234.50" | -0.456 → "-0.46"
pub fn fmt_price(p: f64) -> String {
    if !p.is_finite() {
        return "—".to_string();
    }
    let fixed = format!("{:.2}", p.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let whole: String = grouped.chars().rev().collect();

    let sign = if p < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{whole}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_price() {
        assert_eq!(fmt_price(1_234_567.0), "1,234,567.00");
        assert_eq!(fmt_price(0.0), "0.00");
        assert_eq!(fmt_price(60.5), "60.50");
        assert_eq!(fmt_price(-42_000.126), "-42,000.13");
        assert_eq!(fmt_price(-0.001), "0.00");
        assert_eq!(fmt_price(f64::NAN), "—");
    }

    #[test]
    fn test_timer_accumulates_points() {
        let mut t = Timer::start("Dashboard render");
        assert!(t.summary().starts_with("Dashboard render: 0 points in "));
        t.record(2);
        t.record(3);
        assert_eq!(t.points, 5);
        assert!(t.summary().starts_with("Dashboard render: 5 points in "));

        let mut one = Timer::start("Forecast");
        one.record(1);
        assert!(one.summary().starts_with("Forecast: 1 point in "));
    }
}
