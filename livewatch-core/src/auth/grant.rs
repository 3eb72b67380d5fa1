use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use tracing::debug;

use crate::Error;
use livewatch_common::models::GrantedToken;
use livewatch_common::traits::TokenGrant;

pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Twitch app access token via the client-credentials flow.
pub struct ClientCredentialsGrant {
    http: ReqwestClient,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentialsGrant {
    pub fn new(http: ReqwestClient, client_id: &str, client_secret: &str) -> Self {
        Self {
            http,
            token_url: TWITCH_TOKEN_URL.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }

    /// Point the grant at a different token endpoint.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

#[async_trait]
impl TokenGrant for ClientCredentialsGrant {
    async fn request_token(&self) -> Result<GrantedToken, Error> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self.http
            .post(&self.token_url)
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let granted: GrantedToken = serde_json::from_str(&body)
            .map_err(|e| Error::MalformedToken(format!("{e}: {body}")))?;

        debug!(
            "Token endpoint granted a {} token",
            granted.token_type.as_deref().unwrap_or("bearer")
        );
        Ok(granted)
    }
}
