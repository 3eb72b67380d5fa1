// File: livewatch-core/src/platforms/twitch_helix/client.rs

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use tracing::{debug, warn};

use crate::Error;
use crate::auth::CredentialManager;
use crate::platforms::twitch_helix::requests::stream::StreamsResponse;
use livewatch_common::models::{PresenceInfo, TrackedIdentity};
use livewatch_common::traits::PresenceSource;

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Queries "Get Streams" for one login at a time, authenticating with the
/// app token held by the credential manager.
pub struct TwitchStatusClient {
    http: ReqwestClient,
    base_url: String,
    client_id: String,
    credentials: Arc<CredentialManager>,
}

impl TwitchStatusClient {
    pub fn new(http: ReqwestClient, client_id: &str, credentials: Arc<CredentialManager>) -> Self {
        Self {
            http,
            base_url: HELIX_BASE_URL.to_string(),
            client_id: client_id.to_string(),
            credentials,
        }
    }

    /// Point the client at a different Helix root (no trailing slash).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn fetch_presence(&self, identity: &TrackedIdentity) -> Result<Option<PresenceInfo>, Error> {
        let token = self.credentials.get_token().await?;

        let streams_url = format!("{}/streams", self.base_url);
        let resp = self.http
            .get(&streams_url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&token)
            .query(&[("user_login", identity.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                warn!("Helix rejected the app token for {}; forcing a refresh.", identity);
                self.credentials.invalidate().await;
            }
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let streams: StreamsResponse = serde_json::from_str(&body)
            .map_err(|e| Error::MalformedStatus(format!("{e}: {body}")))?;

        let presence = streams.into_presence(identity);
        debug!("Helix status for {}: live={}", identity, presence.is_some());
        Ok(presence)
    }
}

#[async_trait]
impl PresenceSource for TwitchStatusClient {
    async fn fetch_presence(&self, identity: &TrackedIdentity) -> Result<Option<PresenceInfo>, Error> {
        TwitchStatusClient::fetch_presence(self, identity).await
    }
}
