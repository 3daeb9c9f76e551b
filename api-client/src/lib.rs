//! Typed HTTP client for the backtest backend.
//!
//! The backend is a Java service; its JSON uses camelCase field names
//! and `LocalDateTime` strings without a zone suffix, so the serde
//! renames and date formatting here mirror that wire format exactly.

use std::collections::BTreeMap;

use chart_core::RawChartData;
use chrono::NaiveDate;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "/api/strategy";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] gloo_net::Error),
    #[error("server returned status {status} for {path}")]
    Status { status: u16, path: String },
}

/// Bar interval the backend can resample to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeFrame {
    Min5,
    Hour,
    Day,
    Week,
    Month,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 5] = [
        TimeFrame::Min5,
        TimeFrame::Hour,
        TimeFrame::Day,
        TimeFrame::Week,
        TimeFrame::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Min5 => "MIN5",
            TimeFrame::Hour => "HOUR",
            TimeFrame::Day => "DAY",
            TimeFrame::Week => "WEEK",
            TimeFrame::Month => "MONTH",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::Min5 => "5 Minutes",
            TimeFrame::Hour => "Hour",
            TimeFrame::Day => "Day",
            TimeFrame::Week => "Week",
            TimeFrame::Month => "Month",
        }
    }

    pub fn from_str(s: &str) -> Option<TimeFrame> {
        TimeFrame::ALL.iter().copied().find(|tf| tf.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamId {
    #[serde(rename = "paramName")]
    pub param_name: String,
}

/// One numeric strategy parameter with its declared bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParam {
    pub id: ParamId,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<StrategyParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    pub ticker: String,
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Per-strategy parameter overrides keyed by parameter name.
pub type StrategyParams = BTreeMap<String, StrategyParam>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
    pub ticker: String,
    pub time_frame: TimeFrame,
    pub start_date: String,
    pub end_date: String,
    pub strategy_name_to_params: BTreeMap<String, StrategyParams>,
}

impl BacktestRequest {
    pub fn new(
        ticker: impl Into<String>,
        time_frame: TimeFrame,
        start: NaiveDate,
        end: NaiveDate,
        strategies: BTreeMap<String, StrategyParams>,
    ) -> Self {
        BacktestRequest {
            ticker: ticker.into(),
            time_frame,
            start_date: format_local_date_time(start),
            end_date: format_local_date_time(end),
            strategy_name_to_params: strategies,
        }
    }
}

/// `LocalDateTime` at midnight, e.g. `2024-01-01T00:00:00`.
pub fn format_local_date_time(date: NaiveDate) -> String {
    format!("{}T00:00:00", date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub ticker: String,
    #[serde(rename = "longPnL", default)]
    pub long_pnl: f64,
    #[serde(rename = "shortPnL", default)]
    pub short_pnl: f64,
    #[serde(rename = "buyAndHoldPnL", default)]
    pub buy_and_hold_pnl: f64,
    #[serde(rename = "annualPercentageReturn", default)]
    pub annual_percentage_return: f64,
    #[serde(rename = "profitToLostRatio", default)]
    pub profit_to_lost_ratio: f64,
    #[serde(rename = "profitableTradesCount", default)]
    pub profitable_trades_count: u32,
    #[serde(rename = "lostTradesCount", default)]
    pub lost_trades_count: u32,
    #[serde(rename = "chartDataDTO", default)]
    pub chart_data: RawChartData,
}

/// A named backtest setup the user chose to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConfiguration {
    pub name: String,
    pub request: BacktestRequest,
}

#[derive(Debug, Clone)]
pub struct BacktestClient {
    base_url: String,
}

impl Default for BacktestClient {
    fn default() -> Self {
        BacktestClient::new(DEFAULT_BASE_URL)
    }
}

impl BacktestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        BacktestClient { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Request::get(&self.url(path)).send().await?;
        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
                path: path.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = Request::post(&self.url(path)).json(body)?.send().await?;
        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
                path: path.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    pub async fn available_strategies(&self) -> Result<Vec<StrategyDescriptor>, ApiError> {
        self.get_json("available-strategies").await
    }

    pub async fn available_tickers(&self) -> Result<Vec<TickerInfo>, ApiError> {
        self.get_json("available-tickers").await
    }

    /// Run a backtest and return the summary plus chart payload.
    pub async fn submit_strategies(
        &self,
        request: &BacktestRequest,
    ) -> Result<BacktestResult, ApiError> {
        self.post_json("submitStrategies", request).await
    }

    pub async fn saved_configurations(&self) -> Result<Vec<SavedConfiguration>, ApiError> {
        self.get_json("configurations").await
    }

    pub async fn save_configuration(
        &self,
        configuration: &SavedConfiguration,
    ) -> Result<SavedConfiguration, ApiError> {
        self.post_json("configurations", configuration).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_decodes_backend_payload() {
        let json = r#"{
            "ticker": "SPY",
            "longPnL": 12.5,
            "shortPnL": -3.25,
            "buyAndHoldPnL": 8.0,
            "annualPercentageReturn": 9.4,
            "profitToLostRatio": 1.8,
            "profitableTradesCount": 9,
            "lostTradesCount": 5,
            "chartDataDTO": {
                "prices": [
                    {"date": "2024-01-01T00:00:00", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 100}
                ],
                "signals": [],
                "indicators": {}
            }
        }"#;
        let result: BacktestResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.ticker, "SPY");
        assert_eq!(result.long_pnl, 12.5);
        assert_eq!(result.lost_trades_count, 5);
        assert_eq!(result.chart_data.prices.len(), 1);
    }

    #[test]
    fn request_serializes_camel_case_local_date_time() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        let mut params = StrategyParams::new();
        params.insert(
            "period".into(),
            StrategyParam {
                id: ParamId {
                    param_name: "period".into(),
                },
                value: 14.0,
                min: None,
                max: None,
                description: None,
            },
        );
        let mut strategies = BTreeMap::new();
        strategies.insert("RSI".to_string(), params);
        let request = BacktestRequest::new("SPY", TimeFrame::Day, start, end, strategies);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["timeFrame"], "DAY");
        assert_eq!(value["startDate"], "2023-01-01T00:00:00");
        assert_eq!(value["endDate"], "2023-06-30T00:00:00");
        assert_eq!(
            value["strategyNameToParams"]["RSI"]["period"]["id"]["paramName"],
            "period"
        );
    }

    #[test]
    fn timeframe_round_trips_wire_names() {
        for tf in TimeFrame::ALL {
            assert_eq!(TimeFrame::from_str(tf.as_str()), Some(tf));
            let json = serde_json::to_string(&tf).unwrap();
            assert_eq!(json, format!("\"{}\"", tf.as_str()));
        }
        assert_eq!(TimeFrame::from_str("YEAR"), None);
    }
}
