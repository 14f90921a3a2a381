//! Catalog id → [`RequestIdentity`] resolution with the TMDB fallback chain.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{parse_catalog_id, strip_tmdb_prefix, IdCache, MediaType, MetaRecord, MetadataSource, RequestIdentity};
use crate::error::{Result, StreamError};

static TRAILER_TMDB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tmdb/(\d+)").expect("valid trailer regex"));

/// Outcome of resolving a catalog id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub identity: RequestIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl Resolution {
    /// The TMDB id the provider needs, or `IdentityUnresolved`.
    pub fn tmdb_id(&self) -> Result<&str> {
        self.identity.tmdb_id.as_deref().ok_or_else(|| {
            StreamError::IdentityUnresolved("no TMDB id for this catalog id".into())
        })
    }
}

/// Resolves catalog ids and looks up presentation metadata.
///
/// The cache is injected so several resolvers (or tests) can share or
/// isolate it.
pub struct IdentityResolver {
    source: Arc<dyn MetadataSource>,
    cache: Arc<IdCache>,
}

impl IdentityResolver {
    pub fn new(source: Arc<dyn MetadataSource>, cache: Arc<IdCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &Arc<IdCache> {
        &self.cache
    }

    /// Resolve a catalog id. Never fails: an unresolvable TMDB id leaves
    /// `identity.tmdb_id` empty and skips the title lookup.
    #[instrument(skip(self))]
    pub async fn resolve(&self, catalog_id: &str, media_type: MediaType) -> Resolution {
        let mut identity = parse_catalog_id(catalog_id, media_type);

        if identity.tmdb_id.is_none() {
            if let Some(imdb_id) = identity.imdb_id.clone() {
                info!(%imdb_id, "Converting IMDB id to TMDB id");
                identity.tmdb_id = self.imdb_to_tmdb(&imdb_id, media_type).await;
            }
        }

        if identity.tmdb_id.is_none() {
            return Resolution {
                identity,
                ..Resolution::default()
            };
        }

        let (title, year) = self.display_info(&identity, media_type).await;
        Resolution {
            identity,
            title,
            year,
        }
    }

    /// Map an IMDB id to a TMDB id: cache, then `meta.id`, then
    /// `meta.tmdb_id`, then a `tmdb/<digits>` scan over trailer sources.
    pub async fn imdb_to_tmdb(&self, imdb_id: &str, media_type: MediaType) -> Option<String> {
        if let Some(tmdb_id) = self.cache.get(imdb_id, media_type) {
            debug!(imdb_id, %tmdb_id, "Using cached TMDB id");
            return Some(tmdb_id);
        }

        let meta = match self.source.fetch_meta(media_type, imdb_id).await {
            Ok(Some(meta)) => meta,
            Ok(None) => {
                info!(imdb_id, "Metadata service has no record");
                return None;
            }
            Err(e) => {
                warn!(imdb_id, stage = e.stage(), error = %e, "TMDB id lookup failed");
                return None;
            }
        };

        let found = tmdb_from_meta(&meta);
        match &found {
            Some(tmdb_id) => {
                info!(imdb_id, %tmdb_id, "Found TMDB id");
                self.cache.put(imdb_id, media_type, tmdb_id);
            }
            None => info!(imdb_id, "Could not find TMDB id"),
        }
        found
    }

    async fn display_info(
        &self,
        identity: &RequestIdentity,
        media_type: MediaType,
    ) -> (Option<String>, Option<String>) {
        let lookup_id = match (&identity.imdb_id, &identity.tmdb_id) {
            (Some(imdb), _) => imdb.clone(),
            (None, Some(tmdb)) => format!("tmdb:{tmdb}"),
            (None, None) => return (None, None),
        };

        match self.source.fetch_meta(media_type, &lookup_id).await {
            Ok(Some(meta)) => {
                let title = meta.display_title();
                let year = meta.year_text();
                debug!(?title, ?year, "Got display metadata");
                (title, year)
            }
            Ok(None) => (None, None),
            Err(e) => {
                info!(error = %e, "Proceeding without title/year");
                (None, None)
            }
        }
    }
}

/// Apply the extraction strategies to a metadata record, first hit wins.
pub fn tmdb_from_meta(meta: &MetaRecord) -> Option<String> {
    if let Some(id) = meta.id.as_deref() {
        if id.starts_with("tmdb:") {
            let stripped = strip_tmdb_prefix(id);
            if !stripped.is_empty() {
                return Some(stripped.to_string());
            }
        }
    }

    if let Some(tmdb_id) = meta.tmdb_id_text() {
        return Some(tmdb_id);
    }

    meta.trailers
        .iter()
        .filter_map(|t| t.source.as_deref())
        .find_map(|source| {
            TRAILER_TMDB_RE
                .captures(source)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
}
