use super::{HttpRequest, SeriesProvider};
use crate::error::FetchError;
use crate::normalize::RawSample;

use chrono::{Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

const SERIES_URL: &str = "https://markets.ft.com/data/chartapi/series";

/// Financial Times chart API, quoting in the instrument's own unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinancialTimes {
    pub label: String,
    pub symbol: String,
    pub days: u32,
}

impl FinancialTimes {
    /// Monthly closes over the last ten years.
    pub fn new(label: &str, symbol: &str) -> Self {
        Self {
            label: label.to_string(),
            symbol: symbol.to_string(),
            days: 3650,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeriesRequest<'r> {
    days: u32,
    data_normalized: bool,
    data_period: &'r str,
    data_interval: u32,
    end_offset_days: u32,
    exchange_offset: u32,
    realtime: bool,
    y_format: &'r str,
    time_service_format: &'r str,
    ruler_intraday_start: u32,
    ruler_intraday_stop: u32,
    ruler_interday_start: u32,
    ruler_interday_stop: u32,
    return_date_type: &'r str,
    elements: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct SeriesResponse {
    dates: Vec<String>,
    elements: Vec<Element>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Element {
    component_series: Vec<ComponentSeries>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ComponentSeries {
    #[serde(rename = "Type")]
    kind: String,
    values: Vec<Option<f64>>,
}

/// Epoch millis of a naive ISO8601 time read as local time, so that the
/// normalizer maps it back onto the same calendar date.
fn local_millis(iso8601: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(iso8601, "%Y-%m-%dT%H:%M:%S").ok()?;
    let local = Local.from_local_datetime(&naive);
    local
        .earliest()
        .or_else(|| local.latest())
        .map(|datetime| datetime.timestamp_millis())
}

impl SeriesProvider for FinancialTimes {
    fn name(&self) -> &'static str {
        "FT"
    }

    fn scale(&self) -> f64 {
        1f64
    }

    fn request(&self) -> Result<HttpRequest, FetchError> {
        let request = SeriesRequest {
            days: self.days,
            data_normalized: false,
            data_period: "Month",
            data_interval: 1,
            end_offset_days: 0,
            exchange_offset: 0,
            realtime: false,
            y_format: "0.###",
            time_service_format: "JSON",
            ruler_intraday_start: 26,
            ruler_intraday_stop: 3,
            ruler_interday_start: 10957,
            ruler_interday_stop: 365,
            return_date_type: "ISO8601",
            elements: vec![json!({
                "Label": self.label,
                "Type": "price",
                "Symbol": self.symbol,
                "OverlayIndicators": [],
                "Params": {},
            })],
        };
        let body = serde_json::to_string(&request).map_err(|source| FetchError::Encode {
            provider: self.name(),
            source,
        })?;
        Ok(HttpRequest::post(SERIES_URL).with_body(body))
    }

    /// Close values of every element, zipped with the shared dates.
    fn decode(&self, body: &str) -> Result<Vec<RawSample>, FetchError> {
        let value: Value = serde_json::from_str(body).map_err(|source| FetchError::Decode {
            provider: self.name(),
            source,
        })?;
        let response: SeriesResponse = serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(provider = self.name(), error = %e, "unexpected response shape");
            SeriesResponse::default()
        });

        let mut series = Vec::new();
        for element in &response.elements {
            let close = element
                .component_series
                .iter()
                .find(|component| component.kind == "Close");
            let close = match close {
                Some(close) => close,
                None => continue,
            };

            for (date, value) in response.dates.iter().zip(&close.values) {
                match (local_millis(date), value) {
                    (Some(timestamp_millis), Some(value)) => {
                        series.push(RawSample::new(timestamp_millis, *value))
                    }
                    _ => warn!(provider = self.name(), date = %date, "skipping malformed sample"),
                }
            }
        }
        Ok(series)
    }
}
