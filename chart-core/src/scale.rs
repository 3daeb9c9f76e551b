//! Linear time/value to pixel mapping and axis tick placement.

use crate::{Domain, Timestamp, Viewport};

/// Horizontal grid lines per pane.
pub const GRID_ROWS: usize = 5;
/// Vertical grid lines per pane.
pub const GRID_COLS: usize = 10;
/// Value-axis labels per pane.
pub const VALUE_TICKS: usize = 5;

const TICK_PX: f64 = 80.0;
const MAX_DATE_TICKS: usize = 10;

/// Maps a timestamp to an x pixel inside `[0, width]`. A degenerate
/// window or width maps everything to the horizontal midpoint.
pub fn time_to_x(ts: Timestamp, vp: Viewport, width: f64) -> f64 {
    let span = vp.span_ms() as f64;
    if span <= 0.0 || width <= 0.0 {
        return width * 0.5;
    }
    (ts - vp.start()) as f64 / span * width
}

/// Inverse of [`time_to_x`]: x is clamped to the canvas first, so the
/// result always lies inside the viewport.
pub fn x_to_time(x: f64, vp: Viewport, width: f64) -> Timestamp {
    let span = vp.span_ms() as f64;
    if span <= 0.0 || width <= 0.0 {
        return vp.start();
    }
    let ratio = (x / width).clamp(0.0, 1.0);
    vp.start() + (ratio * span) as i64
}

/// Maps a value to a y pixel, min at the bottom. A degenerate domain or
/// height maps everything to the vertical midpoint.
pub fn value_to_y(value: f64, domain: Domain, height: f64) -> f64 {
    let span = domain.span();
    if !(span > 0.0) || height <= 0.0 {
        return height * 0.5;
    }
    height - (value - domain.min) / span * height
}

/// Date ticks adapt to the canvas: one per ~80px, capped at 10, never
/// fewer than one.
pub fn date_tick_count(width: f64) -> usize {
    ((width / TICK_PX) as usize).min(MAX_DATE_TICKS).max(1)
}

/// `count + 1` evenly spaced timestamps covering the viewport,
/// endpoints included.
pub fn time_ticks(vp: Viewport, count: usize) -> Vec<Timestamp> {
    let count = count.max(1) as i64;
    (0..=count)
        .map(|i| vp.start() + vp.span_ms() * i / count)
        .collect()
}

/// `count + 1` evenly spaced values covering the domain, endpoints
/// included, top first.
pub fn value_ticks(domain: Domain, count: usize) -> Vec<f64> {
    let count = count.max(1);
    (0..=count)
        .map(|i| domain.max - domain.span() * i as f64 / count as f64)
        .collect()
}
