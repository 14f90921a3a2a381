//! Inbound stream-resolution requests.
//!
//! [`StreamHandler`] is the single entry point a hosting layer calls: it
//! resolves the catalog id, hands the identity to the provider, and always
//! answers with a (possibly empty) stream list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::Result;
use crate::identity::{CinemetaClient, IdCache, IdentityResolver, MediaType, MetadataSource};
use crate::stream::providers::CinemaOsProvider;
use crate::stream::{StreamDescriptor, StreamProvider};

/// A stream request as sent by an addon host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(rename = "id")]
    pub catalog_id: String,
}

/// Response body: `{ "streams": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamResponse {
    pub streams: Vec<StreamDescriptor>,
}

pub struct StreamHandler {
    resolver: IdentityResolver,
    provider: Arc<dyn StreamProvider>,
}

impl StreamHandler {
    pub fn new(resolver: IdentityResolver, provider: Arc<dyn StreamProvider>) -> Self {
        Self { resolver, provider }
    }

    /// Wire the default collaborators from configuration.
    pub fn from_config(config: &Config, cache: Arc<IdCache>) -> Result<Self> {
        let metadata: Arc<dyn MetadataSource> = Arc::new(CinemetaClient::new(
            &config.metadata_url,
            config.metadata_timeout(),
        )?);
        let provider = Arc::new(CinemaOsProvider::new(
            &config.provider_url,
            config.provider_timeout(),
        )?);
        Ok(Self::new(IdentityResolver::new(metadata, cache), provider))
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Resolve a request, keeping the failure reason.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn try_handle(&self, request: &StreamRequest) -> Result<Vec<StreamDescriptor>> {
        let resolution = self
            .resolver
            .resolve(&request.catalog_id, request.media_type)
            .await;
        resolution.tmdb_id()?;

        self.provider
            .try_fetch_streams(
                &resolution.identity,
                resolution.title.as_deref(),
                resolution.year.as_deref(),
            )
            .await
    }

    /// Resolve a request. Never fails; every error becomes an empty list.
    pub async fn handle(&self, request: &StreamRequest) -> StreamResponse {
        let streams = match self.try_handle(request).await {
            Ok(streams) => streams,
            Err(e) => {
                warn!(id = %request.catalog_id, stage = e.stage(), error = %e, "Returning no streams");
                Vec::new()
            }
        };
        info!(id = %request.catalog_id, count = streams.len(), "Returning streams");
        StreamResponse { streams }
    }
}
