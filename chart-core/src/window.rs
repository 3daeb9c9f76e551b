//! Viewport and temporal filtering over sorted series.

use crate::{HasTimestamp, Timestamp, Trade, DAY_MS};

/// A closed time window `[start, end]`. Always normalized so
/// `start <= end` regardless of construction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    start: Timestamp,
    end: Timestamp,
}

impl Viewport {
    pub fn new(a: Timestamp, b: Timestamp) -> Self {
        if a <= b {
            Viewport { start: a, end: b }
        } else {
            Viewport { start: b, end: a }
        }
    }

    /// Window covering the `days` days ending at `now`. Used as the
    /// synthetic fallback when a payload carries no usable timestamps.
    pub fn last_days(now: Timestamp, days: i64) -> Self {
        Viewport::new(now - days * DAY_MS, now)
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn span_ms(&self) -> i64 {
        self.end - self.start
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// The contiguous run of `data` whose timestamps fall inside `vp`,
/// endpoints included. `data` must be sorted ascending by timestamp.
pub fn visible_range<T: HasTimestamp>(data: &[T], vp: Viewport) -> &[T] {
    let lo = data.partition_point(|p| p.ts() < vp.start());
    let hi = data.partition_point(|p| p.ts() <= vp.end());
    &data[lo..hi]
}

/// Trades overlapping the window: the open may predate the window and
/// the close may outlive it, as long as some part of the trade's span
/// falls inside.
pub fn visible_trades<'a>(
    trades: &'a [Trade],
    vp: Viewport,
) -> impl Iterator<Item = &'a Trade> + 'a {
    trades
        .iter()
        .filter(move |t| t.open_ts <= vp.end() && t.close_ts >= vp.start())
}

/// Nearest element to `ts` by absolute timestamp distance, considering
/// only elements inside the viewport. Ties resolve to the earlier
/// element. `data` must be sorted ascending.
pub fn nearest_visible<'a, T: HasTimestamp>(
    data: &'a [T],
    vp: Viewport,
    ts: Timestamp,
) -> Option<&'a T> {
    let window = visible_range(data, vp);
    if window.is_empty() {
        return None;
    }
    let idx = window.partition_point(|p| p.ts() < ts);
    let before = idx.checked_sub(1).map(|i| &window[i]);
    let after = window.get(idx);
    match (before, after) {
        (Some(b), Some(a)) => {
            if (ts - b.ts()).abs() <= (a.ts() - ts).abs() {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(b), None) => Some(b),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IndicatorPoint, Side};

    fn pt(ts: i64) -> IndicatorPoint {
        IndicatorPoint { ts, value: 0.0 }
    }

    fn trade(open_ts: i64, close_ts: i64) -> Trade {
        Trade {
            side: Side::Long,
            open_ts,
            close_ts,
            open_price: 0.0,
            close_price: 0.0,
            pnl: 0.0,
        }
    }

    #[test]
    fn viewport_normalizes_reversed_bounds() {
        let vp = Viewport::new(5_000, 1_000);
        assert_eq!(vp.start(), 1_000);
        assert_eq!(vp.end(), 5_000);
    }

    #[test]
    fn visible_range_is_inclusive_at_both_ends() {
        let data = vec![pt(1_000), pt(2_000), pt(3_000), pt(4_000)];
        let vp = Viewport::new(2_000, 3_000);
        let out = visible_range(&data, vp);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].ts, 2_000);
        assert_eq!(out[1].ts, 3_000);
    }

    #[test]
    fn visible_range_is_idempotent() {
        let data = vec![pt(1_000), pt(2_000), pt(3_000), pt(4_000), pt(5_000)];
        let vp = Viewport::new(1_500, 4_500);
        let once = visible_range(&data, vp);
        let twice = visible_range(once, vp);
        assert_eq!(once, twice);
    }

    #[test]
    fn trade_overlap_includes_straddling_trades() {
        let trades = vec![trade(0, 900), trade(500, 1_500), trade(1_200, 5_000), trade(3_100, 4_000)];
        let vp = Viewport::new(1_000, 3_000);
        let seen: Vec<_> = visible_trades(&trades, vp).collect();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].open_ts, 500);
        assert_eq!(seen[1].open_ts, 1_200);
    }

    #[test]
    fn nearest_visible_ignores_points_outside_viewport() {
        let data = vec![pt(1_000), pt(2_000), pt(9_000)];
        let vp = Viewport::new(1_500, 5_000);
        // 1_000 is closer to 1_600 overall, but it is outside the window.
        let hit = nearest_visible(&data, vp, 1_600).unwrap();
        assert_eq!(hit.ts, 2_000);
    }

    #[test]
    fn nearest_visible_tie_prefers_earlier_point() {
        let data = vec![pt(1_000), pt(3_000)];
        let vp = Viewport::new(0, 10_000);
        assert_eq!(nearest_visible(&data, vp, 2_000).unwrap().ts, 1_000);
    }

    #[test]
    fn nearest_visible_empty_window_is_none() {
        let data = vec![pt(1_000)];
        let vp = Viewport::new(2_000, 3_000);
        assert!(nearest_visible(&data, vp, 2_500).is_none());
    }
}
