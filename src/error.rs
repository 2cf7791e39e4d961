//! Unified error types for the Manifold client and smoke test.

use thiserror::Error;

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("failed to load configuration")]
    Config(#[from] envy::Error),

    /// Client construction or request error.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Errors raised by the Manifold REST client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("http request failed")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        /// Endpoint path that was requested.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Requested limit is outside what the endpoint accepts.
    #[error("invalid limit {limit}: must be between 1 and {max}")]
    InvalidLimit {
        /// Limit that was requested.
        limit: u32,
        /// Maximum the endpoint accepts.
        max: u32,
    },

    /// Client configuration failed validation.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// Failures detected by the verification harness.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The market source could not be constructed.
    #[error("failed to create client")]
    Connect(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The fetch call returned an error.
    #[error("failed to fetch markets")]
    Fetch(#[source] ClientError),

    /// The source returned more records than were asked for.
    #[error("requested at most {requested} market(s) but received {returned}")]
    LimitExceeded {
        /// Limit passed to the source.
        requested: u32,
        /// Number of records actually returned.
        returned: usize,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
