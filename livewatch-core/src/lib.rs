// src/lib.rs

pub mod auth;
pub mod http;
pub mod lifecycle;
pub mod platforms;
pub mod tasks;
pub mod template;
pub mod tracker;
pub mod utils;

pub use livewatch_common::error::Error;
pub use livewatch_common::models;
pub use livewatch_common::traits;
