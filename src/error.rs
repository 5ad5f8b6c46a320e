use libledgerfeed::{FetchError, FormatError, LedgerFeedError, ReadError, WriteError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("{0:#}")]
    Command(anyhow::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Fetch(_) => 3,
            Self::Format(_) => 4,
            Self::Write(_) => 5,
            Self::Read(_) => 6,
            Self::Command(_) => 1,
        }
    }
}

impl From<LedgerFeedError> for CliError {
    fn from(error: LedgerFeedError) -> Self {
        match error {
            LedgerFeedError::Fetch(e) => Self::Fetch(e),
            LedgerFeedError::Format(e) => Self::Format(e),
            LedgerFeedError::Read(e) => Self::Read(e),
            LedgerFeedError::Write(e) => Self::Write(e),
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        Self::Command(error)
    }
}
