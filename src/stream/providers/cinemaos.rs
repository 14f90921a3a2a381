//! CinemaOS streaming provider
//!
//! Pipeline per request: sign the identity, GET `/api/provider`, decrypt the
//! `data` envelope, normalize the source tree and shape each entry into a
//! [`StreamDescriptor`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::envelope::{self, EncryptedEnvelope};
use crate::error::{Result, StreamError};
use crate::fingerprint::CHROME_WINDOWS;
use crate::http_client::build_client;
use crate::identity::RequestIdentity;
use crate::signer;
use crate::stream::provider::{RequestHeaders, StreamDescriptor, StreamProvider, TransportHint};
use crate::stream::sources::{self, SourceEntry};

pub const DEFAULT_PROVIDER_URL: &str = "https://cinemaos.tech";
const BRAND: &str = "CinemaOS";

pub struct CinemaOsProvider {
    client: Client,
    base_url: String,
    /// Page origin, sent as `Referer` upstream and handed to players.
    origin: String,
}

impl CinemaOsProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            StreamError::ProviderUnavailable(format!("invalid provider URL {base_url}: {e}"))
        })?;
        let origin = parsed.origin().ascii_serialization();
        let referer = HeaderValue::from_str(&origin)
            .map_err(|e| StreamError::ProviderUnavailable(format!("invalid origin: {e}")))?;

        let client = build_client(CHROME_WINDOWS.to_headers(referer), timeout)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            origin,
        })
    }

    /// Build the signed `/api/provider` URL.
    ///
    /// Episode requests (season known) use `type=tv` and carry
    /// `seasonId`/`episodeId`. Whitespace in the title becomes `+`.
    pub fn request_url(
        &self,
        identity: &RequestIdentity,
        title: Option<&str>,
        year: Option<&str>,
    ) -> String {
        let secret = signer::sign_identity(identity);
        let kind = if identity.is_episode() { "tv" } else { "movie" };

        let mut params: Vec<(&str, String)> = vec![
            ("type", kind.to_string()),
            ("tmdbId", encode(identity.tmdb_id.as_deref())),
            ("imdbId", encode(identity.imdb_id.as_deref())),
        ];
        if let Some(season) = identity.season {
            params.push(("seasonId", season.to_string()));
            params.push((
                "episodeId",
                identity.episode.map(|e| e.to_string()).unwrap_or_default(),
            ));
        }
        params.push(("t", plus_title(title.unwrap_or_default())));
        params.push(("ry", encode(year)));
        params.push(("secret", secret));

        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/api/provider?{query}", self.base_url)
    }

    #[instrument(skip(self, url))]
    async fn fetch_envelope(&self, url: &str) -> Result<EncryptedEnvelope> {
        debug!(%url, "Fetching from CinemaOS");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StreamError::ProviderUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StreamError::ProviderUnavailable(format!(
                "CinemaOS API error: {}",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| StreamError::ProviderUnavailable(e.to_string()))?;
        let json: Value = serde_json::from_str(&body)?;
        let data = json
            .get("data")
            .filter(|d| !d.is_null())
            .cloned()
            .ok_or_else(|| StreamError::MalformedPayload("no data received".into()))?;

        serde_json::from_value(data)
            .map_err(|e| StreamError::MalformedPayload(format!("incomplete envelope: {e}")))
    }

    /// Shape one normalized entry for the caller.
    pub fn to_descriptor(&self, entry: &SourceEntry) -> StreamDescriptor {
        StreamDescriptor {
            display_name: entry.display_name(BRAND),
            url: entry.url.clone(),
            vertical_quality: entry.resolve_quality(),
            transport_hint: TransportHint::from_type(&entry.transport_type),
            request_headers: RequestHeaders {
                referer: self.origin.clone(),
                user_agent: CHROME_WINDOWS.user_agent.to_string(),
            },
        }
    }
}

#[async_trait]
impl StreamProvider for CinemaOsProvider {
    fn name(&self) -> &'static str {
        "cinemaos"
    }

    async fn try_fetch_streams(
        &self,
        identity: &RequestIdentity,
        title: Option<&str>,
        year: Option<&str>,
    ) -> Result<Vec<StreamDescriptor>> {
        if identity.tmdb_id.is_none() {
            return Err(StreamError::IdentityUnresolved(
                "CinemaOS requires a TMDB id".into(),
            ));
        }

        let url = self.request_url(identity, title, year);
        let envelope = self.fetch_envelope(&url).await?;

        // PBKDF2 with 100k rounds is CPU-bound.
        let plaintext = tokio::task::spawn_blocking(move || envelope::decrypt(&envelope))
            .await
            .map_err(|e| StreamError::Decryption(format!("decrypt task failed: {e}")))??;

        let streams: Vec<StreamDescriptor> = sources::try_normalize(&plaintext)?
            .iter()
            .map(|entry| self.to_descriptor(entry))
            .collect();

        info!(count = streams.len(), "CinemaOS streams resolved");
        Ok(streams)
    }
}

fn encode(value: Option<&str>) -> String {
    urlencoding::encode(value.unwrap_or_default()).into_owned()
}

/// Replace each whitespace character with `+`, percent-encoding the rest.
fn plus_title(title: &str) -> String {
    title
        .split(char::is_whitespace)
        .map(|part| urlencoding::encode(part).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}
