//! Unified error type for the achievement board.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required upstream credential is absent. Fails the refresh only.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Connection failure or timeout before any status was received.
    #[error("GET {target} failed: {message}")]
    Http { target: String, message: String },

    /// Upstream answered with a non-2xx status.
    #[error("GET {target} -> {status}: {body:?}")]
    UpstreamStatus {
        target: String,
        status: u16,
        body: String,
    },

    /// Upstream payload did not have the expected shape.
    #[error("{payload} json parse: {message}")]
    Parse { payload: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Connection, timeout, and status failures.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http { .. } | Error::UpstreamStatus { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Error::MissingCredential(_))
    }
}
