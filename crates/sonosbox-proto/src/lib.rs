//! Shared types and the HTTP client for the sonosbox playback service.

pub mod client;
pub mod config;
pub mod error;
pub mod listing;
pub mod path;
pub mod platform;
pub mod protocol;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use listing::{FileListing, JumpMarker};
pub use path::BrowsePath;
pub use protocol::{Endpoint, PlayMode, SpeakerStatus, TransportAction};
