use crate::normalize::RawSample;
use std::path::PathBuf;
use thiserror::Error;

/// Remote series unavailable or undecodable.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{provider} responded with HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("could not encode {provider} request: {source}")]
    Encode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not decode {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid http client configuration: {0}")]
    Client(String),
}

/// A raw sample that has no canonical date or price rendering.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("sample {sample:?} has no representable calendar date")]
    Timestamp { sample: RawSample },

    #[error("sample {sample:?} cannot be rendered as a price with scale {scale}")]
    Value { sample: RawSample, scale: f64 },
}

/// An existing ledger that could not be read.
#[derive(Debug, Error)]
#[error("failed to read ledger `{}'", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// File-system failure while appending to a ledger.
#[derive(Debug, Error)]
#[error("failed to append to ledger `{}'", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Debug, Error)]
pub enum LedgerFeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
