use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal to a run: no usable bearer token could be obtained
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("login failed: {0}")]
    LoginFailed(String),
}

/// Fatal to a run: the requested dates can't be planned
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Date must be provided for 'single' mode")]
    MissingDate,
    #[error("Date {date} is out of range (must be within the next {horizon_days} days)")]
    OutOfRange { date: NaiveDate, horizon_days: i64 },
    #[error("Mode must be one of {names:?}, got '{0}'", names = crate::domain::ScrapeMode::NAMES)]
    UnknownMode(String),
}

/// Snapshot area I/O failure. Logged and absorbed by callers.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
