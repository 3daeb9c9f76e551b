//! Value-axis domain calculation for the three panes.

use crate::{IndicatorPoint, PricePoint, Trade};

const PAD_FRACTION: f64 = 0.1;
const PNL_PAD_FRACTION: f64 = 0.2;

/// An inclusive value range on a vertical axis. Construction always
/// yields `min < max`, so the pixel mapping never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

const PRICE_FALLBACK: Domain = Domain { min: 0.0, max: 100.0 };
const PNL_FALLBACK: Domain = Domain { min: -1.0, max: 1.0 };

fn padded(min: f64, max: f64) -> Domain {
    let span = max - min;
    let pad = if span > 0.0 {
        span * PAD_FRACTION
    } else {
        // Constant series: pad off the value itself so the line sits
        // mid-pane instead of collapsing the axis.
        min.abs().max(1.0) * PAD_FRACTION
    };
    Domain {
        min: min - pad,
        max: max + pad,
    }
}

/// Domain spanning the lows and highs of the visible bars, padded 10%.
pub fn price_domain(points: &[PricePoint]) -> Domain {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        min = min.min(p.low);
        max = max.max(p.high);
    }
    if !min.is_finite() || !max.is_finite() {
        return PRICE_FALLBACK;
    }
    padded(min, max)
}

/// Domain spanning the visible indicator values, padded 10%.
pub fn indicator_domain(points: &[IndicatorPoint]) -> Domain {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        min = min.min(p.value);
        max = max.max(p.value);
    }
    if !min.is_finite() || !max.is_finite() {
        return PRICE_FALLBACK;
    }
    padded(min, max)
}

/// Zero-symmetric domain for trade PnL bars: the zero line always sits
/// mid-pane, with 20% headroom above the largest absolute PnL.
pub fn pnl_domain(trades: &[Trade]) -> Domain {
    let abs_max = trades
        .iter()
        .map(|t| t.pnl.abs())
        .fold(0.0_f64, f64::max);
    if !abs_max.is_finite() || abs_max <= 0.0 {
        return PNL_FALLBACK;
    }
    let extent = abs_max * (1.0 + PNL_PAD_FRACTION);
    Domain {
        min: -extent,
        max: extent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;

    fn bar(low: f64, high: f64) -> PricePoint {
        PricePoint {
            ts: 0,
            open: low,
            high,
            low,
            close: high,
            volume: 0.0,
        }
    }

    fn trade(pnl: f64) -> Trade {
        Trade {
            side: Side::Long,
            open_ts: 0,
            close_ts: 1,
            open_price: 0.0,
            close_price: pnl,
            pnl,
        }
    }

    #[test]
    fn price_domain_pads_low_high_extent() {
        let d = price_domain(&[bar(90.0, 100.0), bar(95.0, 110.0)]);
        assert_eq!(d.min, 88.0);
        assert_eq!(d.max, 112.0);
    }

    #[test]
    fn empty_inputs_use_fixed_fallbacks() {
        assert_eq!(price_domain(&[]), Domain { min: 0.0, max: 100.0 });
        assert_eq!(indicator_domain(&[]), Domain { min: 0.0, max: 100.0 });
        assert_eq!(pnl_domain(&[]), Domain { min: -1.0, max: 1.0 });
    }

    #[test]
    fn constant_series_still_yields_positive_span() {
        let d = price_domain(&[bar(50.0, 50.0), bar(50.0, 50.0)]);
        assert!(d.min < 50.0 && 50.0 < d.max);
        let d = indicator_domain(&[IndicatorPoint { ts: 0, value: 0.0 }]);
        assert!(d.span() > 0.0);
    }

    #[test]
    fn pnl_domain_is_zero_symmetric() {
        let d = pnl_domain(&[trade(-4.0), trade(2.5)]);
        assert_eq!(d.min, -4.8);
        assert_eq!(d.max, 4.8);
        assert_eq!(d.min, -d.max);
    }

    #[test]
    fn all_zero_pnl_uses_fallback() {
        assert_eq!(pnl_domain(&[trade(0.0)]), Domain { min: -1.0, max: 1.0 });
    }
}
