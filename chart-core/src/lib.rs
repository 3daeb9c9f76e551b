//! Core data model and pure chart logic for backtest results.
//!
//! Everything in this crate is host-testable: no canvas, no DOM. The
//! rendering crate maps these types to pixels, this crate decides what
//! the pixels should mean.

pub mod payload;
pub mod range;
pub mod scale;
pub mod trades;
pub mod view;
pub mod window;

use serde::{Deserialize, Serialize};

pub use payload::{ChartData, PayloadError, RawChartData};
pub use range::{indicator_domain, pnl_domain, price_domain, Domain};
pub use scale::{date_tick_count, time_ticks, time_to_x, value_ticks, value_to_y, x_to_time};
pub use trades::reconstruct_trades;
pub use view::{hover_sample, HoverSample, SelectionPhase, ViewState};
pub use window::{nearest_visible, visible_range, visible_trades, Viewport};

/// Milliseconds since the Unix epoch, UTC.
pub type Timestamp = i64;

pub const SECOND_MS: i64 = 1_000;
pub const MINUTE_MS: i64 = 60 * SECOND_MS;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Anything keyed by a timestamp. Lets the window helpers filter
/// prices, signals and indicator points with one implementation.
pub trait HasTimestamp {
    fn ts(&self) -> Timestamp;
}

/// One OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl HasTimestamp for PricePoint {
    fn ts(&self) -> Timestamp {
        self.ts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Open,
    Close,
}

/// The four signal kinds a strategy run can emit. Closed set: anything
/// else in a payload is rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    LongOpen,
    LongClose,
    ShortOpen,
    ShortClose,
}

impl SignalKind {
    pub fn side(self) -> Side {
        match self {
            SignalKind::LongOpen | SignalKind::LongClose => Side::Long,
            SignalKind::ShortOpen | SignalKind::ShortClose => Side::Short,
        }
    }

    pub fn action(self) -> Action {
        match self {
            SignalKind::LongOpen | SignalKind::ShortOpen => Action::Open,
            SignalKind::LongClose | SignalKind::ShortClose => Action::Close,
        }
    }

    pub fn is_open(self) -> bool {
        self.action() == Action::Open
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalKind::LongOpen => "LongOpen",
            SignalKind::LongClose => "LongClose",
            SignalKind::ShortOpen => "ShortOpen",
            SignalKind::ShortClose => "ShortClose",
        }
    }
}

/// A strategy entry/exit event at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub ts: Timestamp,
    pub kind: SignalKind,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl HasTimestamp for Signal {
    fn ts(&self) -> Timestamp {
        self.ts
    }
}

/// One sample of a named indicator series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub ts: Timestamp,
    pub value: f64,
}

impl HasTimestamp for IndicatorPoint {
    fn ts(&self) -> Timestamp {
        self.ts
    }
}

/// A completed round trip reconstructed from an open/close signal pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub side: Side,
    pub open_ts: Timestamp,
    pub close_ts: Timestamp,
    pub open_price: f64,
    pub close_price: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn is_gain(&self) -> bool {
        self.pnl >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_kind_sides_and_actions() {
        assert_eq!(SignalKind::LongOpen.side(), Side::Long);
        assert_eq!(SignalKind::ShortClose.side(), Side::Short);
        assert_eq!(SignalKind::LongOpen.action(), Action::Open);
        assert_eq!(SignalKind::LongClose.action(), Action::Close);
        assert!(SignalKind::ShortOpen.is_open());
        assert!(!SignalKind::ShortClose.is_open());
    }

    #[test]
    fn signal_kind_rejects_unknown_variant() {
        let err = serde_json::from_str::<SignalKind>("\"LongHold\"");
        assert!(err.is_err());
    }
}
