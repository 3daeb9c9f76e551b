//! Zoom selection state machine and hover/tooltip derivation.

use crate::{
    nearest_visible, visible_range, x_to_time, ChartData, PricePoint, Signal, Timestamp, Viewport,
};

/// Drag must cover at least this fraction of the canvas width before a
/// release commits a zoom.
pub const MIN_SELECTION_FRACTION: f64 = 0.05;

/// An in-flight drag selection, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPhase {
    pub anchor_x: f64,
    pub cursor_x: f64,
}

/// Viewport plus zoom gesture state for one chart.
///
/// `original` is the full-span window computed when data was loaded;
/// `current` is what the panes render. Transitions report whether the
/// viewport changed so the caller knows when a redraw of every pane is
/// due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    original: Viewport,
    current: Viewport,
    selection: Option<SelectionPhase>,
}

impl ViewState {
    pub fn new(original: Viewport) -> Self {
        ViewState {
            original,
            current: original,
            selection: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.current
    }

    pub fn original(&self) -> Viewport {
        self.original
    }

    pub fn is_zoomed(&self) -> bool {
        self.current != self.original
    }

    pub fn selection(&self) -> Option<SelectionPhase> {
        self.selection
    }

    /// True while a drag is in progress. Hover readouts are suppressed
    /// for the duration so they never overlap the selection rectangle.
    pub fn is_selecting(&self) -> bool {
        self.selection.is_some()
    }

    /// New data, new full-span window. Any zoom or drag is discarded.
    pub fn set_original(&mut self, original: Viewport) {
        self.original = original;
        self.current = original;
        self.selection = None;
    }

    pub fn begin_selection(&mut self, x: f64) {
        self.selection = Some(SelectionPhase {
            anchor_x: x,
            cursor_x: x,
        });
    }

    /// No-op unless a drag is in progress.
    pub fn update_selection(&mut self, x: f64) {
        if let Some(sel) = &mut self.selection {
            sel.cursor_x = x;
        }
    }

    /// Pointer left the canvas mid-drag.
    pub fn cancel_selection(&mut self) {
        self.selection = None;
    }

    /// Ends the drag. Commits a new viewport when the selection spans at
    /// least 5% of `width`; the committed window comes from mapping both
    /// gesture pixels back to timestamps, so it is normalized no matter
    /// which direction the user dragged. Returns whether the viewport
    /// changed.
    pub fn finish_selection(&mut self, width: f64) -> bool {
        let Some(sel) = self.selection.take() else {
            return false;
        };
        if width <= 0.0 || (sel.cursor_x - sel.anchor_x).abs() < width * MIN_SELECTION_FRACTION {
            return false;
        }
        let a = x_to_time(sel.anchor_x, self.current, width);
        let b = x_to_time(sel.cursor_x, self.current, width);
        let next = Viewport::new(a, b);
        if next == self.current {
            return false;
        }
        self.current = next;
        true
    }

    /// Back to the full-span window. Returns whether the viewport
    /// changed.
    pub fn reset(&mut self) -> bool {
        self.selection = None;
        if self.current == self.original {
            return false;
        }
        self.current = self.original;
        true
    }
}

/// Everything the tooltip shows for one hovered bar.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverSample<'a> {
    pub point: &'a PricePoint,
    pub signals: Vec<&'a Signal>,
    pub indicators: Vec<(&'a str, f64)>,
}

/// Resolves a hover timestamp to the nearest visible bar, with every
/// signal and indicator value sampled at exactly that bar's timestamp.
/// Bars outside the viewport are never candidates, even when closer.
pub fn hover_sample<'a>(
    data: &'a ChartData,
    vp: Viewport,
    ts: Timestamp,
) -> Option<HoverSample<'a>> {
    let point = nearest_visible(&data.prices, vp, ts)?;
    let at = Viewport::new(point.ts, point.ts);
    let signals = visible_range(&data.signals, at).iter().collect();
    let indicators = data
        .indicators
        .iter()
        .filter_map(|(name, series)| {
            let idx = series.partition_point(|p| p.ts < point.ts);
            series
                .get(idx)
                .filter(|p| p.ts == point.ts)
                .map(|p| (name.as_str(), p.value))
        })
        .collect();
    Some(HoverSample {
        point,
        signals,
        indicators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IndicatorPoint, SignalKind};
    use std::collections::BTreeMap;

    fn state() -> ViewState {
        ViewState::new(Viewport::new(0, 100_000))
    }

    #[test]
    fn short_drag_commits_nothing() {
        let mut vs = state();
        vs.begin_selection(100.0);
        vs.update_selection(139.0);
        // 39px < 5% of 800.
        assert!(!vs.finish_selection(800.0));
        assert!(!vs.is_zoomed());
        assert!(vs.selection().is_none());
    }

    #[test]
    fn drag_commits_normalized_viewport() {
        let mut vs = state();
        // Right-to-left drag over half the canvas.
        vs.begin_selection(600.0);
        vs.update_selection(200.0);
        assert!(vs.finish_selection(800.0));
        assert!(vs.is_zoomed());
        let vp = vs.viewport();
        assert_eq!(vp.start(), 25_000);
        assert_eq!(vp.end(), 75_000);
    }

    #[test]
    fn zoom_composes_relative_to_current_viewport() {
        let mut vs = state();
        vs.begin_selection(0.0);
        vs.update_selection(400.0);
        assert!(vs.finish_selection(800.0));
        assert_eq!(vs.viewport(), Viewport::new(0, 50_000));

        vs.begin_selection(400.0);
        vs.update_selection(800.0);
        assert!(vs.finish_selection(800.0));
        assert_eq!(vs.viewport(), Viewport::new(25_000, 50_000));
    }

    #[test]
    fn reset_restores_original_window() {
        let mut vs = state();
        vs.begin_selection(0.0);
        vs.update_selection(400.0);
        vs.finish_selection(800.0);
        assert!(vs.is_zoomed());
        assert!(vs.reset());
        assert_eq!(vs.viewport(), vs.original());
        // Already unzoomed: nothing to redraw.
        assert!(!vs.reset());
    }

    #[test]
    fn cancel_discards_drag_without_commit() {
        let mut vs = state();
        vs.begin_selection(100.0);
        vs.update_selection(700.0);
        vs.cancel_selection();
        assert!(!vs.finish_selection(800.0));
        assert!(!vs.is_zoomed());
    }

    #[test]
    fn selecting_only_between_press_and_release() {
        let mut vs = state();
        assert!(!vs.is_selecting());
        vs.begin_selection(100.0);
        assert!(vs.is_selecting());
        vs.update_selection(500.0);
        assert!(vs.is_selecting());
        vs.finish_selection(800.0);
        assert!(!vs.is_selecting());

        vs.begin_selection(100.0);
        vs.cancel_selection();
        assert!(!vs.is_selecting());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut vs = state();
        vs.update_selection(500.0);
        assert!(!vs.finish_selection(800.0));
    }

    #[test]
    fn new_data_discards_zoom() {
        let mut vs = state();
        vs.begin_selection(0.0);
        vs.update_selection(400.0);
        vs.finish_selection(800.0);
        vs.set_original(Viewport::new(0, 50_000));
        assert!(!vs.is_zoomed());
        assert_eq!(vs.viewport(), Viewport::new(0, 50_000));
    }

    fn data() -> ChartData {
        let bar = |ts: i64, close: f64| PricePoint {
            ts,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        };
        let mut indicators = BTreeMap::new();
        indicators.insert(
            "sma".to_string(),
            vec![
                IndicatorPoint { ts: 1_000, value: 9.5 },
                IndicatorPoint { ts: 3_000, value: 10.5 },
            ],
        );
        ChartData {
            prices: vec![bar(1_000, 10.0), bar(2_000, 11.0), bar(3_000, 12.0), bar(9_000, 13.0)],
            signals: vec![Signal {
                ts: 3_000,
                kind: SignalKind::LongOpen,
                price: 12.0,
                comment: None,
            }],
            indicators,
        }
    }

    #[test]
    fn hover_picks_nearest_bar_inside_viewport_only() {
        let data = data();
        let vp = Viewport::new(2_500, 5_000);
        // 2_000 is nearer to 2_600 but sits outside the window.
        let hover = hover_sample(&data, vp, 2_600).unwrap();
        assert_eq!(hover.point.ts, 3_000);
        assert_eq!(hover.signals.len(), 1);
        assert_eq!(hover.indicators, vec![("sma", 10.5)]);
    }

    #[test]
    fn hover_on_bar_without_events_is_bare() {
        let data = data();
        let vp = Viewport::new(0, 10_000);
        let hover = hover_sample(&data, vp, 2_100).unwrap();
        assert_eq!(hover.point.ts, 2_000);
        assert!(hover.signals.is_empty());
        assert!(hover.indicators.is_empty());
    }

    #[test]
    fn hover_outside_any_data_is_none() {
        let data = data();
        let vp = Viewport::new(4_000, 8_000);
        assert!(hover_sample(&data, vp, 5_000).is_none());
    }
}
