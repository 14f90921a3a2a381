//! Request signing for the CinemaOS provider API.
//!
//! The provider authenticates each `/api/provider` call with a `secret`
//! query parameter: a two-stage HMAC-SHA256 over a canonical content string
//! built from the request identity. The token is a pure function of its
//! inputs and is recomputed for every request.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::identity::RequestIdentity;

type HmacSha256 = Hmac<Sha256>;

/// First-stage key shared with the provider.
const PRIMARY_KEY: &str = "a7f3b9c2e8d4f1a6b5c9e2d7f4a8b3c6e1d9f7a4b2c8e5d3f9a6b4c1e7d2f8a5";
/// Second-stage key shared with the provider.
const SECONDARY_KEY: &str = "d3f8a5b2c9e6d1f7a4b8c5e2d9f3a6b1c7e4d8f2a9b5c3e7d4f1a8b6c2e9d5f3";

/// Build the canonical `key:value|key:value` string.
///
/// Fields appear in the fixed order `tmdbId`, `imdbId`, `seasonId`,
/// `episodeId`. Absent or empty values are left out entirely.
pub fn content_string(
    tmdb_id: Option<&str>,
    imdb_id: Option<&str>,
    season: Option<&str>,
    episode: Option<&str>,
) -> String {
    [
        ("tmdbId", tmdb_id),
        ("imdbId", imdb_id),
        ("seasonId", season),
        ("episodeId", episode),
    ]
    .into_iter()
    .filter_map(|(key, value)| match value {
        Some(v) if !v.is_empty() => Some(format!("{key}:{v}")),
        _ => None,
    })
    .collect::<Vec<_>>()
    .join("|")
}

/// Derive the 64-character lowercase hex `AuthToken`.
pub fn sign(
    tmdb_id: Option<&str>,
    imdb_id: Option<&str>,
    season: Option<&str>,
    episode: Option<&str>,
) -> String {
    let content = content_string(tmdb_id, imdb_id, season, episode);
    let first = hmac_hex(PRIMARY_KEY, &content);
    // The second stage consumes the hex text of the first digest, not its raw bytes.
    hmac_hex(SECONDARY_KEY, &first)
}

/// Sign every field of a resolved identity.
pub fn sign_identity(identity: &RequestIdentity) -> String {
    let season = identity.season.map(|s| s.to_string());
    let episode = identity.episode.map(|e| e.to_string());
    sign(
        identity.tmdb_id.as_deref(),
        identity.imdb_id.as_deref(),
        season.as_deref(),
        episode.as_deref(),
    )
}

fn hmac_hex(key: &str, data: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
