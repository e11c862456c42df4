//! Error kinds shared across PulseWatch crates.

use thiserror::Error;

/// Why a single poll failed.
///
/// Every variant is handled the same way at the display boundary: it is
/// logged and written to the status indicator. None of them stops polling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Connection failure, timeout, or a non-2xx response.
    #[error("{0}")]
    Transport(String),

    /// The server answered 2xx but embedded an `error` field in the body.
    #[error("Server error: {0}")]
    ServerReported(String),

    /// The body could not be decoded into a metrics snapshot.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl PollError {
    /// Short machine-friendly name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "transport",
            PollError::ServerReported(_) => "server_reported",
            PollError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Invalid configuration or control input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("max_points must be at least 1")]
    ZeroCapacity,
}
