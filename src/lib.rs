//! `cinemaos` - CinemaOS stream resolution
//!
//! # Features
//!
//! - **Identity resolution**: `tt…` / `tmdb:…` catalog ids, IMDB → TMDB mapping
//!   through a Cinemeta-compatible metadata service, process-wide id cache
//! - **Request signing**: two-stage HMAC-SHA256 `secret` token
//! - **Envelope decryption**: PBKDF2-HMAC-SHA256 + AES-256-GCM
//! - **Source normalization**: nested source/quality trees to flat,
//!   quality-tagged stream descriptors
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cinemaos::{Config, IdCache, MediaType, StreamHandler, StreamRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let handler = StreamHandler::from_config(&Config::default(), Arc::new(IdCache::new()))?;
//!     let response = handler
//!         .handle(&StreamRequest {
//!             media_type: MediaType::Movie,
//!             catalog_id: "tt0133093".into(),
//!         })
//!         .await;
//!     println!("{} streams", response.streams.len());
//!     Ok(())
//! }
//! ```

pub mod addon;
pub mod config;
pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod http_client;
pub mod identity;
pub mod signer;
pub mod stream;

pub use addon::{StreamHandler, StreamRequest, StreamResponse};
pub use config::Config;
pub use envelope::EncryptedEnvelope;
pub use error::{Result, StreamError};
pub use identity::{
    parse_catalog_id, CinemetaClient, IdCache, IdentityResolver, MediaType, MetadataSource,
    RequestIdentity, Resolution,
};
pub use stream::providers::CinemaOsProvider;
pub use stream::{SourceEntry, StreamDescriptor, StreamProvider, TransportHint};

/// Version of cinemaos
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
