//! Shared reqwest client for the Twitch endpoints.
//!
//! The grant exchange and the status query go through the same client so
//! they share one connection pool and one request timeout. The client is
//! dropped together with the server context on shutdown.

use std::time::Duration;

use crate::Error;

/// Total per-request timeout, connect included.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("livewatch/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
