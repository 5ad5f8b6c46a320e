use super::{HttpRequest, SeriesProvider};
use crate::error::FetchError;
use crate::normalize::RawSample;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

const PRICES_URL: &str =
    "http://charts.londonstockexchange.com/WebCharts/services/ChartWService.asmx/GetPrices";

/// London Stock Exchange chart service, quoting in pence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LondonStockExchange {
    pub key: String,
    pub sample_time: String,
    pub time_frame: String,
}

impl LondonStockExchange {
    /// Daily samples over the last five years for `key`, e.g. `UKX.FTD`.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            sample_time: String::from("1d"),
            time_frame: String::from("5y"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ChartRequest<'r> {
    sample_time: &'r str,
    time_frame: &'r str,
    requested_data_set_type: &'r str,
    chart_price_type: &'r str,
    key: &'r str,
    off_set: i64,
    from_date: Option<&'r str>,
    to_date: Option<&'r str>,
    use_delay: bool,
    key_type: &'r str,
    key_type2: &'r str,
    language: &'r str,
}

#[derive(Serialize)]
struct ChartEnvelope<'r> {
    request: ChartRequest<'r>,
}

fn sample_of(entry: &Value) -> Option<RawSample> {
    let pair = entry.as_array()?;
    let timestamp = pair.first()?;
    let timestamp_millis = timestamp
        .as_i64()
        .or_else(|| timestamp.as_f64().map(|t| t as i64))?;
    let value = pair.get(1)?.as_f64()?;
    Some(RawSample::new(timestamp_millis, value))
}

impl SeriesProvider for LondonStockExchange {
    fn name(&self) -> &'static str {
        "LSE"
    }

    fn scale(&self) -> f64 {
        100f64
    }

    fn request(&self) -> Result<HttpRequest, FetchError> {
        let envelope = ChartEnvelope {
            request: ChartRequest {
                sample_time: &self.sample_time,
                time_frame: &self.time_frame,
                requested_data_set_type: "ohlc",
                chart_price_type: "price",
                key: &self.key,
                off_set: 0,
                from_date: None,
                to_date: None,
                use_delay: true,
                key_type: "Topic",
                key_type2: "Topic",
                language: "en",
            },
        };
        let body = serde_json::to_string(&envelope).map_err(|source| FetchError::Encode {
            provider: self.name(),
            source,
        })?;
        Ok(HttpRequest::post(PRICES_URL).with_body(body))
    }

    fn decode(&self, body: &str) -> Result<Vec<RawSample>, FetchError> {
        let response: Value = serde_json::from_str(body).map_err(|source| FetchError::Decode {
            provider: self.name(),
            source,
        })?;

        let entries = match response.get("d").and_then(Value::as_array) {
            Some(entries) => entries,
            None => return Ok(Vec::new()),
        };

        let mut series = Vec::with_capacity(entries.len());
        for entry in entries {
            match sample_of(entry) {
                Some(sample) => series.push(sample),
                None => warn!(provider = self.name(), %entry, "skipping malformed sample"),
            }
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use crate::fetch::{HttpMethod, LondonStockExchange, SeriesProvider};
    use crate::normalize::RawSample;
    use serde_json::Value;

    use anyhow::{anyhow, Result};

    #[test]
    fn request_carries_key() -> Result<()> {
        let request = LondonStockExchange::new("UKX.FTD").request()?;
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with("ChartWService.asmx/GetPrices"));

        let body: Value = serde_json::from_str(request.body.as_deref().ok_or(anyhow!("no body"))?)?;
        let inner = &body["request"];
        assert_eq!(inner["Key"], "UKX.FTD");
        assert_eq!(inner["SampleTime"], "1d");
        assert_eq!(inner["TimeFrame"], "5y");
        assert_eq!(inner["KeyType2"], "Topic");
        assert_eq!(inner["OffSet"], 0);
        assert_eq!(inner["UseDelay"], true);
        assert!(inner["FromDate"].is_null());
        Ok(())
    }

    #[test]
    fn decode_series() -> Result<()> {
        let series = LondonStockExchange::new("UKX.FTD")
            .decode(r#"{"d": [[1420070400000, 510.500], [1511327045000, 202.150]]}"#)?;
        assert_eq!(
            series,
            vec![
                RawSample::new(1420070400000, 510.5),
                RawSample::new(1511327045000, 202.15),
            ]
        );
        Ok(())
    }

    #[test]
    fn decode_empty_or_missing_series() -> Result<()> {
        let lse = LondonStockExchange::new("UKX.FTD");
        assert!(lse.decode(r#"{"d": []}"#)?.is_empty());
        assert!(lse.decode(r#"{}"#)?.is_empty());
        assert!(lse.decode(r#"{"d": null}"#)?.is_empty());
        Ok(())
    }

    #[test]
    fn decode_skips_malformed_entries() -> Result<()> {
        let series = LondonStockExchange::new("UKX.FTD")
            .decode(r#"{"d": [[1420070400000], "x", [1420070400000.0, 12], [null, 1]]}"#)?;
        assert_eq!(series, vec![RawSample::new(1420070400000, 12.0)]);
        Ok(())
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(LondonStockExchange::new("UKX.FTD").decode("Service Unavailable").is_err());
    }
}
