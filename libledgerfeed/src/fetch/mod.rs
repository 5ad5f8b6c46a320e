use crate::error::FetchError;
use crate::normalize::RawSample;

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

mod ft;
mod lse;

pub use ft::FinancialTimes;
pub use lse::LondonStockExchange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outgoing request built by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Blocking transport used by the fetcher.
pub trait HttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// Request defaults handed to the fetcher instead of living in globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub headers: BTreeMap<String, String>,
    pub user_agent: String,
    /// `None` waits for the provider as long as it takes.
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(
            String::from("content-type"),
            String::from("application/json"),
        );
        Self {
            headers,
            user_agent: format!("ledgerfeed/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

/// `HttpClient` backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::blocking::Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let transport = |message: String| FetchError::Transport {
            url: request.url.clone(),
            message,
        };

        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                transport(format!("request timeout: {}", e))
            } else if e.is_connect() {
                transport(format!("connection failed: {}", e))
            } else {
                transport(format!("request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| transport(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

/// A market-data endpoint serving a price series.
pub trait SeriesProvider {
    fn name(&self) -> &'static str;

    /// Divisor from the provider's unit into the ledger's unit.
    fn scale(&self) -> f64;

    fn request(&self) -> Result<HttpRequest, FetchError>;

    /// Extract the series from a response body.
    ///
    /// A body that is not JSON is an error, a JSON body without a usable
    /// series is an empty series.
    fn decode(&self, body: &str) -> Result<Vec<RawSample>, FetchError>;
}

pub struct Fetcher<C: HttpClient> {
    client: C,
    config: FetchConfig,
}

impl Fetcher<ReqwestHttpClient> {
    pub fn from_config(config: FetchConfig) -> Result<Self, FetchError> {
        Ok(Self::new(ReqwestHttpClient::new(&config)?, config))
    }
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C, config: FetchConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn fetch<P: SeriesProvider + ?Sized>(
        &self,
        provider: &P,
    ) -> Result<Vec<RawSample>, FetchError> {
        let mut request = provider.request()?;
        for (name, value) in &self.config.headers {
            request
                .headers
                .entry(name.to_ascii_lowercase())
                .or_insert_with(|| value.clone());
        }

        debug!(provider = provider.name(), url = %request.url, "fetching series");
        let response = self.client.execute(request)?;
        if !response.is_success() {
            return Err(FetchError::Status {
                provider: provider.name(),
                status: response.status,
            });
        }

        let series = provider.decode(&response.body)?;
        info!(
            provider = provider.name(),
            samples = series.len(),
            "fetched series"
        );
        Ok(series)
    }
}
