//! Metadata collaborator (Cinemeta-compatible `/meta/{type}/{id}.json`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, instrument};

use super::MediaType;
use crate::error::{Result, StreamError};
use crate::fingerprint::METADATA_USER_AGENT;
use crate::http_client::build_client;

pub const DEFAULT_METADATA_URL: &str = "https://v3-cinemeta.strem.io";

/// The subset of a `meta` object used for id mapping and presentation.
///
/// Every field is optional and read leniently: a field of the wrong type
/// (or an explicit `null`) is treated as absent rather than failing the
/// whole record. `tmdb_id` and `year` arrive as either strings or numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaRecord {
    /// Primary id, `tt…` or `tmdb:<id>`
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub trailers: Vec<Trailer>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trailer {
    /// Trailer URL or video key
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
}

/// Deserialize `T`, mapping a value of the wrong shape to `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserialize a list, skipping elements of the wrong shape. Anything but
/// an array is an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

impl MetaRecord {
    /// `tmdb_id` rendered as text, if present and non-empty.
    pub fn tmdb_id_text(&self) -> Option<String> {
        self.tmdb_id.as_ref().and_then(value_text)
    }

    /// Display title, preferring `name` over `title`.
    pub fn display_title(&self) -> Option<String> {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.title.clone().filter(|t| !t.is_empty()))
    }

    pub fn year_text(&self) -> Option<String> {
        self.year.as_ref().and_then(value_text)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct MetaResponse {
    #[serde(default, deserialize_with = "lenient")]
    meta: Option<MetaRecord>,
}

/// Source of catalog metadata keyed by IMDB id or `tmdb:<id>`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the `meta` record, or `None` when the service has no record.
    async fn fetch_meta(&self, media_type: MediaType, id: &str) -> Result<Option<MetaRecord>>;
}

/// HTTP client for a Cinemeta-compatible metadata service.
pub struct CinemetaClient {
    client: Client,
    base_url: String,
}

impl CinemetaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(METADATA_USER_AGENT));
        let client = build_client(headers, timeout)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn meta_url(&self, media_type: MediaType, id: &str) -> String {
        format!("{}/meta/{}/{}.json", self.base_url, media_type, id)
    }
}

#[async_trait]
impl MetadataSource for CinemetaClient {
    #[instrument(skip(self))]
    async fn fetch_meta(&self, media_type: MediaType, id: &str) -> Result<Option<MetaRecord>> {
        let url = self.meta_url(media_type, id);
        debug!(%url, "Fetching metadata");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StreamError::IdentityUnresolved(format!("metadata request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(StreamError::IdentityUnresolved(format!(
                "metadata service error: {}",
                resp.status()
            )));
        }

        let data: MetaResponse = resp.json().await.map_err(|e| {
            StreamError::IdentityUnresolved(format!("metadata response unreadable: {e}"))
        })?;
        Ok(data.meta)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_meta_record_accessors() {
        let meta: MetaRecord = serde_json::from_value(json!({
            "id": "tt0133093",
            "tmdb_id": 603,
            "name": "",
            "title": "The Matrix",
            "year": "1999"
        }))
        .unwrap();
        assert_eq!(meta.tmdb_id_text().as_deref(), Some("603"));
        assert_eq!(meta.display_title().as_deref(), Some("The Matrix"));
        assert_eq!(meta.year_text().as_deref(), Some("1999"));
        assert!(meta.trailers.is_empty());
    }

    #[test]
    fn test_meta_record_tolerates_missing_fields() {
        let meta: MetaRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(meta.id, None);
        assert_eq!(meta.tmdb_id_text(), None);
        assert_eq!(meta.display_title(), None);
    }

    #[test]
    fn test_meta_record_tolerates_wrong_types() {
        let meta: MetaRecord =
            serde_json::from_value(json!({ "id": "tmdb:603", "trailers": null })).unwrap();
        assert_eq!(meta.id.as_deref(), Some("tmdb:603"));
        assert!(meta.trailers.is_empty());

        let meta: MetaRecord = serde_json::from_value(json!({
            "id": "tmdb:603",
            "name": ["x"],
            "title": 42,
            "trailers": [
                { "source": 123 },
                "not-an-object",
                { "source": "https://api.themoviedb.org/tmdb/603" }
            ]
        }))
        .unwrap();
        assert_eq!(meta.id.as_deref(), Some("tmdb:603"));
        assert_eq!(meta.display_title(), None);
        assert_eq!(meta.trailers.len(), 2);
        assert_eq!(meta.trailers[0].source, None);
        assert_eq!(
            meta.trailers[1].source.as_deref(),
            Some("https://api.themoviedb.org/tmdb/603")
        );
    }

    #[tokio::test]
    async fn test_fetch_meta_with_odd_fields_keeps_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/meta/movie/tt0133093.json");
                then.status(200).json_body(json!({
                    "meta": { "id": "tmdb:603", "trailers": null, "name": ["x"] }
                }));
            })
            .await;

        let client = CinemetaClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let meta = client
            .fetch_meta(MediaType::Movie, "tt0133093")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(meta.id.as_deref(), Some("tmdb:603"));
        assert!(meta.trailers.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_meta() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/meta/series/tt0903747.json")
                    .header("user-agent", METADATA_USER_AGENT);
                then.status(200).json_body(json!({
                    "meta": { "id": "tt0903747", "name": "Breaking Bad", "year": "2008–2013" }
                }));
            })
            .await;

        let client = CinemetaClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let meta = client
            .fetch_meta(MediaType::Series, "tt0903747")
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(meta.display_title().as_deref(), Some("Breaking Bad"));
        assert_eq!(meta.year_text().as_deref(), Some("2008–2013"));
    }

    #[tokio::test]
    async fn test_fetch_meta_missing_record() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/meta/movie/tt0000000.json");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = CinemetaClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let meta = client.fetch_meta(MediaType::Movie, "tt0000000").await.unwrap();
        assert!(meta.is_none());
    }

    #[tokio::test]
    async fn test_fetch_meta_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/meta/movie/tt1.json");
                then.status(503);
            })
            .await;

        let client = CinemetaClient::new(&server.base_url(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_meta(MediaType::Movie, "tt1").await.unwrap_err();
        assert_eq!(err.stage(), "identity");
    }
}
