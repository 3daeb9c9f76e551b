//! Pixel geometry for the three panes. Pure math over chart-core
//! types, so everything here runs under host tests.

use chart_core::{
    time_to_x, value_to_y, Domain, IndicatorPoint, PricePoint, Signal, SignalKind, Trade, Viewport,
};

/// Candles fill this fraction of their time slot.
pub const CANDLE_FILL: f64 = 0.8;
/// Candle body width cap.
pub const CANDLE_MAX_PX: f64 = 15.0;
/// Trades shorter than this still get a visible bar.
pub const TRADE_BAR_MIN_PX: f64 = 2.0;
/// Bars narrower than this skip their inline PnL label.
pub const TRADE_LABEL_MIN_PX: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGeom {
    pub x: f64,
    pub half_width: f64,
    pub y_open: f64,
    pub y_high: f64,
    pub y_low: f64,
    pub y_close: f64,
    pub bullish: bool,
}

/// Body width for `visible` candles sharing `width` pixels.
pub fn candle_width(visible: usize, width: f64) -> f64 {
    (width / visible.max(1) as f64 * CANDLE_FILL).min(CANDLE_MAX_PX)
}

pub fn candles(
    points: &[PricePoint],
    vp: Viewport,
    domain: Domain,
    width: f64,
    height: f64,
) -> Vec<CandleGeom> {
    let half_width = candle_width(points.len(), width) * 0.5;
    points
        .iter()
        .map(|p| CandleGeom {
            x: time_to_x(p.ts, vp, width),
            half_width,
            y_open: value_to_y(p.open, domain, height),
            y_high: value_to_y(p.high, domain, height),
            y_low: value_to_y(p.low, domain, height),
            y_close: value_to_y(p.close, domain, height),
            bullish: p.close >= p.open,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerGeom {
    pub x: f64,
    pub y: f64,
    pub kind: SignalKind,
}

pub fn markers(
    signals: &[Signal],
    vp: Viewport,
    domain: Domain,
    width: f64,
    height: f64,
) -> Vec<MarkerGeom> {
    signals
        .iter()
        .map(|s| MarkerGeom {
            x: time_to_x(s.ts, vp, width),
            y: value_to_y(s.price, domain, height),
            kind: s.kind,
        })
        .collect()
}

pub fn polyline(
    points: &[IndicatorPoint],
    vp: Viewport,
    domain: Domain,
    width: f64,
    height: f64,
) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|p| (time_to_x(p.ts, vp, width), value_to_y(p.value, domain, height)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeBarGeom {
    pub x: f64,
    pub width: f64,
    pub y: f64,
    pub height: f64,
    pub pnl: f64,
    pub gain: bool,
    pub show_label: bool,
}

/// Bars spanning open to close on the time axis, rising or falling from
/// the zero line by |pnl|. Spans are clamped to the viewport so a trade
/// straddling the window edge still renders the part inside it.
pub fn trade_bars(
    trades: &[Trade],
    vp: Viewport,
    domain: Domain,
    width: f64,
    height: f64,
) -> Vec<TradeBarGeom> {
    let zero_y = value_to_y(0.0, domain, height);
    trades
        .iter()
        .map(|t| {
            let open = t.open_ts.clamp(vp.start(), vp.end());
            let close = t.close_ts.clamp(vp.start(), vp.end());
            let x = time_to_x(open, vp, width);
            let span = (time_to_x(close, vp, width) - x).max(TRADE_BAR_MIN_PX);
            let pnl_y = value_to_y(t.pnl, domain, height);
            TradeBarGeom {
                x,
                width: span,
                y: pnl_y.min(zero_y),
                height: (pnl_y - zero_y).abs(),
                pnl: t.pnl,
                gain: t.is_gain(),
                show_label: span > TRADE_LABEL_MIN_PX,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::Side;

    fn vp() -> Viewport {
        Viewport::new(0, 10_000)
    }

    #[test]
    fn candle_width_adapts_and_caps() {
        assert_eq!(candle_width(100, 800.0), 6.4);
        assert_eq!(candle_width(10, 800.0), 15.0);
        // No division by zero on an empty window.
        assert!(candle_width(0, 800.0).is_finite());
    }

    #[test]
    fn candle_direction_follows_close_vs_open() {
        let domain = Domain { min: 0.0, max: 100.0 };
        let mk = |open: f64, close: f64| PricePoint {
            ts: 5_000,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 0.0,
        };
        let out = candles(&[mk(10.0, 20.0), mk(20.0, 10.0), mk(15.0, 15.0)], vp(), domain, 800.0, 300.0);
        assert!(out[0].bullish);
        assert!(!out[1].bullish);
        assert!(out[2].bullish);
        assert!(out[0].y_close < out[0].y_open);
    }

    #[test]
    fn trade_bar_rises_or_falls_from_zero_line() {
        let domain = Domain { min: -12.0, max: 12.0 };
        let height = 200.0;
        let zero_y = 100.0;
        let mk = |pnl: f64| Trade {
            side: Side::Long,
            open_ts: 2_000,
            close_ts: 8_000,
            open_price: 0.0,
            close_price: 0.0,
            pnl,
        };
        let out = trade_bars(&[mk(6.0), mk(-6.0)], vp(), domain, 800.0, height);
        assert_eq!(out[0].y + out[0].height, zero_y);
        assert_eq!(out[1].y, zero_y);
        assert_eq!(out[0].height, out[1].height);
        assert!(out[0].gain && !out[1].gain);
    }

    #[test]
    fn straddling_trade_is_clamped_to_viewport() {
        let domain = Domain { min: -1.0, max: 1.0 };
        let t = Trade {
            side: Side::Short,
            open_ts: -5_000,
            close_ts: 15_000,
            open_price: 0.0,
            close_price: 0.0,
            pnl: 0.5,
        };
        let out = trade_bars(&[t], vp(), domain, 800.0, 200.0);
        assert_eq!(out[0].x, 0.0);
        assert_eq!(out[0].width, 800.0);
    }

    #[test]
    fn instant_trade_keeps_minimum_bar_width() {
        let domain = Domain { min: -1.0, max: 1.0 };
        let t = Trade {
            side: Side::Long,
            open_ts: 4_000,
            close_ts: 4_001,
            open_price: 0.0,
            close_price: 0.0,
            pnl: 0.1,
        };
        let out = trade_bars(&[t], vp(), domain, 800.0, 200.0);
        assert_eq!(out[0].width, TRADE_BAR_MIN_PX);
        assert!(!out[0].show_label);
    }
}
