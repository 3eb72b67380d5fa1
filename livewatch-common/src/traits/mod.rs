// File: livewatch-common/src/traits/mod.rs

pub mod auth_traits;
pub mod notification_traits;
pub mod presence_traits;

pub use auth_traits::TokenGrant;
pub use notification_traits::NotificationSink;
pub use presence_traits::PresenceSource;
