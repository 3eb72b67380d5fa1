pub mod credential_manager;
pub mod grant;

pub use credential_manager::{CredentialManager, TOKEN_SAFETY_MARGIN_SECS};
pub use grant::{ClientCredentialsGrant, TWITCH_TOKEN_URL};
