use async_trait::async_trait;

use crate::error::Error;
use crate::models::credential::GrantedToken;

/// Performs one token exchange against an auth endpoint.
///
/// Implementations do not cache; caching and expiry live in the
/// credential manager that owns the grant.
#[async_trait]
pub trait TokenGrant: Send + Sync {
    async fn request_token(&self) -> Result<GrantedToken, Error>;
}
