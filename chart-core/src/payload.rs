//! Ingestion of the backend result payload into sorted series.
//!
//! The backend serializes timestamps as ISO-8601 strings (Java
//! `LocalDateTime`, so usually without a zone suffix). Rows whose date
//! does not parse are dropped with a warning rather than failing the
//! whole payload.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{IndicatorPoint, PricePoint, Signal, SignalKind, Timestamp, Viewport};

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid result payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result payload as sent by the backend, before date parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawChartData {
    #[serde(default)]
    pub prices: Vec<RawPricePoint>,
    #[serde(default)]
    pub signals: Vec<RawSignal>,
    #[serde(default)]
    pub indicators: BTreeMap<String, Vec<RawIndicatorPoint>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPricePoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSignal {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIndicatorPoint {
    pub date: String,
    pub value: f64,
}

/// ISO-8601 to epoch milliseconds. Accepts an explicit offset, a bare
/// `LocalDateTime` (with or without fractional seconds, taken as UTC),
/// or a bare date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }
    None
}

/// Parsed, timestamp-sorted chart payload. Every series in here is
/// sorted ascending, which the window helpers rely on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub prices: Vec<PricePoint>,
    pub signals: Vec<Signal>,
    pub indicators: BTreeMap<String, Vec<IndicatorPoint>>,
}

impl ChartData {
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let raw: RawChartData = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: RawChartData) -> Self {
        let mut prices: Vec<PricePoint> = raw
            .prices
            .into_iter()
            .filter_map(|p| match parse_timestamp(&p.date) {
                Some(ts) => Some(PricePoint {
                    ts,
                    open: p.open,
                    high: p.high,
                    low: p.low,
                    close: p.close,
                    volume: p.volume,
                }),
                None => {
                    log::warn!("dropping price row with unparseable date {:?}", p.date);
                    None
                }
            })
            .collect();
        prices.sort_by_key(|p| p.ts);

        let mut signals: Vec<Signal> = raw
            .signals
            .into_iter()
            .filter_map(|s| match parse_timestamp(&s.date) {
                Some(ts) => Some(Signal {
                    ts,
                    kind: s.kind,
                    price: s.price,
                    comment: s.comment,
                }),
                None => {
                    log::warn!("dropping signal with unparseable date {:?}", s.date);
                    None
                }
            })
            .collect();
        signals.sort_by_key(|s| s.ts);

        let indicators = raw
            .indicators
            .into_iter()
            .map(|(name, series)| {
                let mut points: Vec<IndicatorPoint> = series
                    .into_iter()
                    .filter_map(|p| match parse_timestamp(&p.date) {
                        Some(ts) => Some(IndicatorPoint { ts, value: p.value }),
                        None => {
                            log::warn!(
                                "dropping {name} indicator point with unparseable date {:?}",
                                p.date
                            );
                            None
                        }
                    })
                    .collect();
                points.sort_by_key(|p| p.ts);
                (name, points)
            })
            .collect();

        ChartData {
            prices,
            signals,
            indicators,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn indicator_names(&self) -> Vec<&str> {
        self.indicators.keys().map(String::as_str).collect()
    }

    pub fn indicator(&self, name: &str) -> Option<&[IndicatorPoint]> {
        self.indicators.get(name).map(Vec::as_slice)
    }

    /// Full-span viewport covering the price series. With no valid bars
    /// the chart still needs axes to draw, so fall back to the 30 days
    /// ending at `now`; a single bar gets a day of context either side.
    pub fn full_viewport(&self, now: Timestamp) -> Viewport {
        match (self.prices.first(), self.prices.last()) {
            (Some(first), Some(last)) if first.ts < last.ts => Viewport::new(first.ts, last.ts),
            (Some(only), Some(_)) => {
                Viewport::new(only.ts - crate::DAY_MS, only.ts + crate::DAY_MS)
            }
            _ => Viewport::last_days(now, 30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DAY_MS;

    const PAYLOAD: &str = r#"{
        "prices": [
            {"date": "2024-01-02T00:00:00", "open": 10.0, "high": 12.0, "low": 9.0, "close": 11.0, "volume": 1000},
            {"date": "2024-01-01T00:00:00", "open": 9.0, "high": 10.5, "low": 8.5, "close": 10.0, "volume": 900},
            {"date": "not-a-date", "open": 0.0, "high": 0.0, "low": 0.0, "close": 0.0}
        ],
        "signals": [
            {"date": "2024-01-02T00:00:00", "type": "LongOpen", "price": 11.0, "comment": "breakout"}
        ],
        "indicators": {
            "sma20": [
                {"date": "2024-01-01T00:00:00", "value": 9.8},
                {"date": "2024-01-02T00:00:00", "value": 10.4}
            ]
        }
    }"#;

    #[test]
    fn parses_sorts_and_drops_bad_rows() {
        let data = ChartData::from_json(PAYLOAD).unwrap();
        assert_eq!(data.prices.len(), 2);
        assert!(data.prices[0].ts < data.prices[1].ts);
        assert_eq!(data.prices[0].close, 10.0);
        assert_eq!(data.signals.len(), 1);
        assert_eq!(data.signals[0].kind, SignalKind::LongOpen);
        assert_eq!(data.indicator_names(), vec!["sma20"]);
        assert_eq!(data.indicator("sma20").unwrap().len(), 2);
    }

    #[test]
    fn accepts_common_iso_shapes() {
        let midnight = parse_timestamp("2024-01-01").unwrap();
        let explicit = parse_timestamp("2024-01-01T00:00:00").unwrap();
        let zoned = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        let fractional = parse_timestamp("2024-01-01T00:00:00.250").unwrap();
        assert_eq!(midnight, explicit);
        assert_eq!(midnight, zoned);
        assert_eq!(fractional - midnight, 250);
        assert!(parse_timestamp("01/02/2024").is_none());
    }

    #[test]
    fn full_viewport_spans_price_series() {
        let data = ChartData::from_json(PAYLOAD).unwrap();
        let vp = data.full_viewport(0);
        assert_eq!(vp.start(), data.prices[0].ts);
        assert_eq!(vp.end(), data.prices[1].ts);
    }

    #[test]
    fn empty_payload_falls_back_to_last_30_days() {
        let data = ChartData::from_json("{}").unwrap();
        assert!(data.is_empty());
        let now = 1_700_000_000_000;
        let vp = data.full_viewport(now);
        assert_eq!(vp.end(), now);
        assert_eq!(vp.span_ms(), 30 * DAY_MS);
    }

    #[test]
    fn single_bar_viewport_is_not_degenerate() {
        let raw = RawChartData {
            prices: vec![RawPricePoint {
                date: "2024-01-01".into(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 0.0,
            }],
            ..Default::default()
        };
        let data = ChartData::from_raw(raw);
        let vp = data.full_viewport(0);
        assert!(vp.span_ms() > 0);
        assert!(vp.contains(data.prices[0].ts));
    }
}
