//! ApiClient: one HTTP client for every playback-service endpoint.
//!
//! All calls are plain GETs. A call succeeds on a 2xx status; JSON bodies
//! are decoded into the caller's type. Nothing here retries or caches.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::{ApiError, ApiResult};
use crate::path::BrowsePath;
use crate::protocol::{Endpoint, PlayMode, SpeakerStatus, TransportAction};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (scheme and host, no trailing path).
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidUrl("URL cannot be empty".into()));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "{} must start with http:// or https://",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(format!("sonosbox/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &Endpoint<'_>) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Names under `path`; directories carry a trailing `/`.
    pub async fn list_files(&self, path: &BrowsePath) -> ApiResult<Vec<String>> {
        self.get_json(&Endpoint::FileList(path)).await
    }

    pub async fn list_speakers(&self) -> ApiResult<Vec<SpeakerStatus>> {
        self.get_json(&Endpoint::Speakers).await
    }

    /// Status of one speaker. The service answers with an array; an empty
    /// address returns every speaker.
    pub async fn speaker_status(&self, address: &str) -> ApiResult<Vec<SpeakerStatus>> {
        self.get_json(&Endpoint::Speaker(address)).await
    }

    /// Start playing `path` on `address`, or queue it next.
    pub async fn control(&self, mode: PlayMode, address: &str, path: &str) -> ApiResult<()> {
        self.get_ok(&Endpoint::Control {
            mode,
            address,
            path,
        })
        .await
    }

    pub async fn playback(&self, address: &str, action: TransportAction) -> ApiResult<()> {
        self.get_ok(&Endpoint::Playback { address, action }).await
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint<'_>) -> ApiResult<T> {
        let body = self.get(endpoint).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            endpoint: endpoint.path(),
            message: e.to_string(),
        })
    }

    async fn get_ok(&self, endpoint: &Endpoint<'_>) -> ApiResult<()> {
        self.get(endpoint).await.map(|_| ())
    }

    async fn get(&self, endpoint: &Endpoint<'_>) -> ApiResult<Vec<u8>> {
        let url = self.url_for(endpoint);
        debug!(url = %url, "GET");

        let response = self.http.get(&url).send().await?;
        // Only 200 counts; other 2xx codes are errors too.
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                endpoint: endpoint.path(),
                status: status.as_u16(),
            });
        }

        let total = response.content_length();
        let body = response.bytes().await?;
        match total {
            Some(total) => trace!(url = %url, "{} B of {} B loaded", body.len(), total),
            None => trace!(url = %url, "{} B loaded", body.len()),
        }
        Ok(body.to_vec())
    }
}
