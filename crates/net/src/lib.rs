//! STREAMIA Network Library
//!
//! HTTP access to the STREAMIA backend.
//!
//! # Architecture
//!
//! - **Client**: [`ApiClient`] owns the `reqwest` client, base URL and token store
//! - **Response**: every call yields an [`ApiResponse`] envelope, never a raised error
//! - **Endpoints**: account, favorites/ratings and movie lookup live in their own modules
//!
//! # Usage
//!
//! ```ignore
//! let client = ApiClient::new("https://streamia-server.onrender.com", tokens)?;
//! let resp = client.login(&Credentials::new("ana@example.com", "Secreta#2025")).await;
//! if let Some(payload) = resp.data {
//!     client.tokens().save(&payload.token)?;
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod favorites;
pub mod media;
pub mod response;

#[cfg(test)]
mod testing;

pub use client::{normalize_base_url, ApiClient, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use media::{extract_subtitles, extract_video_url, resolve_playback, PlaybackSource};
pub use response::{ApiResponse, EMAIL_TAKEN, NETWORK_ERROR, SESSION_EXPIRED};

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://streamia-server.onrender.com";
