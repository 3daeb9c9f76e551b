//! Stateless canvas drawing primitives shared by the three panes.

use chart_core::scale::{GRID_COLS, GRID_ROWS, VALUE_TICKS};
use chart_core::{date_tick_count, time_ticks, time_to_x, value_ticks, value_to_y, Domain, HoverSample, SignalKind, Timestamp, Viewport};
use chrono::DateTime;
use js_sys::Array;
use web_sys::CanvasRenderingContext2d;

pub const BG: &str = "#ffffff";
pub const GRID: &str = "#dddddd";
pub const AXIS_TEXT: &str = "#666666";
pub const BULL: &str = "#22c55e";
pub const BEAR: &str = "#ef4444";
pub const SHORT_OPEN: &str = "#3b82f6";
pub const SHORT_CLOSE: &str = "#f97316";
pub const INDICATOR_LINE: &str = "#8b5cf6";
pub const CROSSHAIR: &str = "#999999";
pub const SELECTION_FILL: &str = "rgba(59, 130, 246, 0.15)";
pub const SELECTION_EDGE: &str = "#3b82f6";

const FONT: &str = "11px sans-serif";
const MARKER_HALF: f64 = 5.0;

pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_fill_style_str(BG);
    ctx.fill_rect(0.0, 0.0, width, height);
}

pub fn no_data(ctx: &CanvasRenderingContext2d, width: f64, height: f64, message: &str) {
    ctx.set_fill_style_str(AXIS_TEXT);
    ctx.set_font("13px sans-serif");
    ctx.set_text_align("center");
    ctx.fill_text(message, width * 0.5, height * 0.5).ok();
    ctx.set_text_align("left");
}

pub fn grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.set_stroke_style_str(GRID);
    ctx.set_line_width(0.5);
    for i in 0..=GRID_ROWS {
        let y = i as f64 / GRID_ROWS as f64 * height;
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
        ctx.stroke();
    }
    for i in 0..=GRID_COLS {
        let x = i as f64 / GRID_COLS as f64 * width;
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, height);
        ctx.stroke();
    }
}

fn format_date(ts: Timestamp) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn date_axis(ctx: &CanvasRenderingContext2d, vp: Viewport, width: f64, height: f64) {
    ctx.set_fill_style_str(AXIS_TEXT);
    ctx.set_font(FONT);
    ctx.set_text_align("center");
    for ts in time_ticks(vp, date_tick_count(width)) {
        let x = time_to_x(ts, vp, width);
        ctx.fill_text(&format_date(ts), x, height - 5.0).ok();
    }
    ctx.set_text_align("left");
}

pub fn value_axis(ctx: &CanvasRenderingContext2d, domain: Domain, height: f64, title: &str) {
    ctx.set_fill_style_str(AXIS_TEXT);
    ctx.set_font(FONT);
    for value in value_ticks(domain, VALUE_TICKS) {
        let y = value_to_y(value, domain, height);
        // Keep the top and bottom labels inside the pane.
        let y = y.clamp(10.0, height - 4.0);
        ctx.fill_text(&format!("{value:.2}"), 4.0, y).ok();
    }
    ctx.save();
    ctx.translate(12.0, height * 0.5).ok();
    ctx.rotate(-std::f64::consts::FRAC_PI_2).ok();
    ctx.set_text_align("center");
    ctx.fill_text(title, 0.0, -40.0).ok();
    ctx.restore();
}

pub fn zero_line(ctx: &CanvasRenderingContext2d, domain: Domain, width: f64, height: f64) {
    let y = value_to_y(0.0, domain, height);
    ctx.set_stroke_style_str(AXIS_TEXT);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.move_to(0.0, y);
    ctx.line_to(width, y);
    ctx.stroke();
}

pub fn candles(ctx: &CanvasRenderingContext2d, geoms: &[crate::layout::CandleGeom]) {
    for g in geoms {
        let color = if g.bullish { BULL } else { BEAR };
        ctx.set_stroke_style_str(color);
        ctx.set_fill_style_str(color);
        ctx.set_line_width(1.0);
        // Wick spans the full high/low extent behind the body.
        ctx.begin_path();
        ctx.move_to(g.x, g.y_high);
        ctx.line_to(g.x, g.y_low);
        ctx.stroke();
        let top = g.y_open.min(g.y_close);
        let body = (g.y_open - g.y_close).abs().max(1.0);
        ctx.fill_rect(g.x - g.half_width, top, g.half_width * 2.0, body);
    }
}

fn triangle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, pointing_up: bool) {
    let dir = if pointing_up { 1.0 } else { -1.0 };
    ctx.begin_path();
    ctx.move_to(x, y - dir * MARKER_HALF);
    ctx.line_to(x - MARKER_HALF, y + dir * MARKER_HALF);
    ctx.line_to(x + MARKER_HALF, y + dir * MARKER_HALF);
    ctx.close_path();
    ctx.fill();
}

pub fn markers(ctx: &CanvasRenderingContext2d, geoms: &[crate::layout::MarkerGeom]) {
    for m in geoms {
        let color = match m.kind {
            SignalKind::LongOpen => BULL,
            SignalKind::LongClose => BEAR,
            SignalKind::ShortOpen => SHORT_OPEN,
            SignalKind::ShortClose => SHORT_CLOSE,
        };
        ctx.set_fill_style_str(color);
        triangle(ctx, m.x, m.y, m.kind.is_open());
    }
}

pub fn polyline(ctx: &CanvasRenderingContext2d, points: &[(f64, f64)], color: &str) {
    if points.len() < 2 {
        return;
    }
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        ctx.line_to(x, y);
    }
    ctx.stroke();
}

pub fn trade_bars(ctx: &CanvasRenderingContext2d, geoms: &[crate::layout::TradeBarGeom]) {
    for g in geoms {
        let color = if g.gain { BULL } else { BEAR };
        ctx.set_fill_style_str(color);
        ctx.fill_rect(g.x, g.y, g.width, g.height);
        let gradient = ctx.create_linear_gradient(g.x, g.y, g.x, g.y + g.height);
        if gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.35)").is_ok()
            && gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0.0)").is_ok()
        {
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(g.x, g.y, g.width, g.height);
        }
        if g.show_label {
            ctx.set_fill_style_str(AXIS_TEXT);
            ctx.set_font(FONT);
            ctx.set_text_align("center");
            let label_y = if g.pnl >= 0.0 { g.y - 3.0 } else { g.y + g.height + 11.0 };
            ctx.fill_text(&format!("{:.2}", g.pnl), g.x + g.width * 0.5, label_y)
                .ok();
            ctx.set_text_align("left");
        }
    }
}

pub fn crosshair(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: Option<f64>,
    width: f64,
    height: f64,
) {
    ctx.set_stroke_style_str(CROSSHAIR);
    ctx.set_line_width(1.0);
    let _ = ctx.set_line_dash(&Array::of2(&4.0.into(), &4.0.into()));
    ctx.begin_path();
    ctx.move_to(x, 0.0);
    ctx.line_to(x, height);
    ctx.stroke();
    if let Some(y) = y {
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(width, y);
        ctx.stroke();
    }
    let _ = ctx.set_line_dash(&Array::new());
}

pub fn selection(ctx: &CanvasRenderingContext2d, a_x: f64, b_x: f64, height: f64) {
    let left = a_x.min(b_x);
    let span = (b_x - a_x).abs();
    ctx.set_fill_style_str(SELECTION_FILL);
    ctx.fill_rect(left, 0.0, span, height);
    ctx.set_stroke_style_str(SELECTION_EDGE);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(left, 0.0, span, height);
}

/// Tooltip box anchored at the hover position, flipped left when it
/// would overflow the right edge.
pub fn tooltip(
    ctx: &CanvasRenderingContext2d,
    sample: &HoverSample,
    x: f64,
    y: f64,
    width: f64,
) {
    let mut lines: Vec<String> = vec![
        format_date(sample.point.ts),
        format!("Open:  {:.2}", sample.point.open),
        format!("High:  {:.2}", sample.point.high),
        format!("Low:   {:.2}", sample.point.low),
        format!("Close: {:.2}", sample.point.close),
        format!("Volume: {:.0}", sample.point.volume),
    ];
    for (name, value) in &sample.indicators {
        lines.push(format!("{name}: {value:.2}"));
    }
    for signal in &sample.signals {
        lines.push(format!("{} @ {:.2}", signal.kind.label(), signal.price));
    }

    let line_height = 14.0;
    let box_width = 150.0;
    let box_height = lines.len() as f64 * line_height + 8.0;
    let box_x = if x + 15.0 + box_width > width {
        x - 15.0 - box_width
    } else {
        x + 15.0
    };
    let box_y = (y + 15.0).max(0.0);

    ctx.set_fill_style_str("rgba(255, 255, 255, 0.95)");
    ctx.fill_rect(box_x, box_y, box_width, box_height);
    ctx.set_stroke_style_str(GRID);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(box_x, box_y, box_width, box_height);
    ctx.set_fill_style_str("#333333");
    ctx.set_font(FONT);
    for (i, line) in lines.iter().enumerate() {
        ctx.fill_text(line, box_x + 6.0, box_y + 12.0 + i as f64 * line_height)
            .ok();
    }
}
