//! Stream provider trait and common types.
//!
//! A [`StreamProvider`] turns a resolved [`RequestIdentity`] into the final,
//! caller-facing [`StreamDescriptor`] list. Providers never fail towards the
//! caller: [`StreamProvider::fetch_streams`] degrades every error to an empty
//! list, while [`StreamProvider::try_fetch_streams`] keeps the reason for
//! diagnostics.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::identity::RequestIdentity;

/// Manifest transport of a stream. Progressive video has no hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportHint {
    Hls,
    Dash,
}

impl TransportHint {
    /// Infer the transport from a provider `type` field.
    pub fn from_type(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        if lower.contains("hls") {
            Some(TransportHint::Hls)
        } else if lower.contains("dash") {
            Some(TransportHint::Dash)
        } else {
            None
        }
    }
}

/// Headers a player must send when opening the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeaders {
    /// Provider origin the CDN expects as referrer
    #[serde(rename = "Referer")]
    pub referer: String,
    /// Browser user agent matching the one used to fetch the sources
    #[serde(rename = "User-Agent")]
    pub user_agent: String,
}

/// One playable stream, serialized in addon wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Label shown to the user, e.g. "CinemaOS [Alpha] FHD fast"
    #[serde(rename = "name")]
    pub display_name: String,
    /// Playable URL (manifest or progressive file)
    pub url: String,
    /// Vertical resolution in pixels (e.g., 720, 1080).
    #[serde(rename = "quality")]
    pub vertical_quality: u32,
    /// Manifest transport; `None` for progressive video
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transport_hint: Option<TransportHint>,
    /// Headers the player must send
    #[serde(rename = "headers")]
    pub request_headers: RequestHeaders,
}

/// Trait for stream-source providers.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Short lowercase provider name (e.g., `"cinemaos"`).
    fn name(&self) -> &'static str;

    /// Resolve streams, keeping the failure reason.
    async fn try_fetch_streams(
        &self,
        identity: &RequestIdentity,
        title: Option<&str>,
        year: Option<&str>,
    ) -> Result<Vec<StreamDescriptor>>;

    /// Resolve streams; any failure is logged and yields an empty list.
    async fn fetch_streams(
        &self,
        identity: &RequestIdentity,
        title: Option<&str>,
        year: Option<&str>,
    ) -> Vec<StreamDescriptor> {
        match self.try_fetch_streams(identity, title, year).await {
            Ok(streams) => streams,
            Err(e) => {
                warn!(provider = self.name(), stage = e.stage(), error = %e, "No streams available");
                Vec::new()
            }
        }
    }
}
