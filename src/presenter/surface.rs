//! Chart drawing seam plus a fixed-grid text implementation for terminals.
//!
//! The text chart is deterministic so it can be golden-tested:
//! - series line: `.`
//! - data points: `*`
//! - y labels on the top/bottom rows, one year tick per calendar year below the axis

use super::{tooltip_label, y_domain, year_ticks, ChartSeries};
use crate::models::{DisplayPoint, ModelMetrics};
use crate::utils::fmt_price;

/// Whatever actually puts pixels (or characters) on screen.
pub trait ChartSurface {
    fn draw(&mut self, series: &ChartSeries);
}

/// Accumulates rendered charts into a string buffer.
pub struct TextSurface {
    width: usize,
    height: usize,
    buffer: String,
}

impl TextSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(10),
            height: height.max(3),
            buffer: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl ChartSurface for TextSurface {
    fn draw(&mut self, series: &ChartSeries) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer
            .push_str(&render_text_chart(series, self.width, self.height));
    }
}

pub fn render_text_chart(series: &ChartSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(3);

    let Some((y_lo, y_hi)) = y_domain(&series.points) else {
        return format!("{}\n  (no data)\n", series.title);
    };
    let points: Vec<DisplayPoint> = series
        .points
        .iter()
        .copied()
        .filter(|p| p.y.is_finite())
        .collect();

    let x_min = points.iter().map(|p| p.x).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.x).max().unwrap_or(0);
    let (y_min, y_max) = pad_range(y_lo, y_hi, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = points
        .iter()
        .map(|p| {
            (
                map_x(p.x, x_min, x_max, width),
                map_y(p.y, y_min, y_max, height),
            )
        })
        .collect();
    for pair in cells.windows(2) {
        draw_line(&mut grid, pair[0], pair[1], '.');
    }
    for &(x, y) in &cells {
        grid[y][x] = '*';
    }

    let top = fmt_price(y_max);
    let bottom = fmt_price(y_min);
    let gutter = top.len().max(bottom.len());

    let mut out = format!(
        "{} | {} pts | {} .. {}\n",
        series.title,
        points.len(),
        tooltip_label(x_min),
        tooltip_label(x_max)
    );

    for (i, row) in grid.into_iter().enumerate() {
        let label = if i == 0 {
            top.as_str()
        } else if i == height - 1 {
            bottom.as_str()
        } else {
            ""
        };
        out.push_str(&format!(
            "{label:>gutter$} |{}\n",
            row.into_iter().collect::<String>()
        ));
    }
    out.push_str(&format!("{:>gutter$} +{}\n", "", "-".repeat(width)));

    let mut ticks = vec![' '; width];
    let mut next_free = 0usize;
    for (x, label) in year_ticks(&points) {
        let len = label.chars().count();
        if len > width {
            continue;
        }
        let start = map_x(x, x_min, x_max, width).min(width - len);
        if start < next_free {
            continue;
        }
        for (offset, ch) in label.chars().enumerate() {
            ticks[start + offset] = ch;
        }
        next_free = start + len + 1;
    }
    let ticks: String = ticks.into_iter().collect();
    out.push_str(&format!("{:>gutter$}  {}\n", "", ticks.trim_end()));

    out
}

/// The static model accuracy panel.
pub fn render_metrics(metrics: &ModelMetrics) -> String {
    format!(
        "Model Performance\n  RMSE: {}\n  MAE: {}\n",
        metrics.rmse, metrics.mae
    )
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: i64, x_min: i64, x_max: i64, width: usize) -> usize {
    if x_max <= x_min {
        return 0;
    }
    let u = ((x - x_min) as f64 / (x_max - x_min) as f64).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // row 0 is the top, i.e. y_max
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(y0 as usize)
            .and_then(|row| row.get_mut(x0 as usize))
        {
            if *cell == ' ' {
                *cell = ch;
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
