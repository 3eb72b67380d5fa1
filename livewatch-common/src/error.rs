// ================================================================
// File: livewatch-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Required startup configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The client-credentials grant was rejected by the auth endpoint.
    #[error("Authentication error: HTTP {status} => {body}")]
    Auth { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    MalformedToken(String),

    /// The status endpoint answered with a non-success status.
    #[error("Status API error: HTTP {status} => {body}")]
    Api { status: u16, body: String },

    #[error("Malformed status response: {0}")]
    MalformedStatus(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for failures of the grant exchange.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth { .. } | Error::MalformedToken(_))
    }

    /// True for failures of the status query itself.
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api { .. } | Error::MalformedStatus(_))
    }
}
