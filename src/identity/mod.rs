//! Catalog identifier parsing and IMDB → TMDB resolution.
//!
//! Catalog ids arrive as `tt…` (IMDB) or `tmdb:…` (TMDB). Series ids carry
//! `:<season>:<episode>` suffixes. The provider only understands TMDB ids,
//! so IMDB-only requests are mapped through a [`MetadataSource`].

pub mod cache;
pub mod metadata;
pub mod resolver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use cache::IdCache;
pub use metadata::{CinemetaClient, MetaRecord, MetadataSource};
pub use resolver::{IdentityResolver, Resolution};

const TMDB_PREFIX: &str = "tmdb:";

/// Catalog media type as used by addon requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Series,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "series" | "tv" => Ok(MediaType::Series),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// Identity of a single movie or episode request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl RequestIdentity {
    /// `true` when the request targets an episode rather than a movie.
    pub fn is_episode(&self) -> bool {
        self.season.is_some()
    }
}

/// Split a catalog id into its identity fields without any network lookup.
///
/// Unknown prefixes yield an empty identity. Non-numeric season or episode
/// components become `None`.
pub fn parse_catalog_id(catalog_id: &str, media_type: MediaType) -> RequestIdentity {
    let mut identity = RequestIdentity::default();

    match media_type {
        MediaType::Movie => {
            if catalog_id.starts_with("tt") {
                identity.imdb_id = Some(catalog_id.to_string());
            } else if let Some(tmdb) = catalog_id.strip_prefix(TMDB_PREFIX) {
                identity.tmdb_id = non_empty(tmdb);
            }
        }
        MediaType::Series => {
            let parts: Vec<&str> = catalog_id.split(':').collect();
            if parts[0].starts_with("tt") {
                identity.imdb_id = Some(parts[0].to_string());
                identity.season = parts.get(1).and_then(|s| leading_int(s));
                identity.episode = parts.get(2).and_then(|s| leading_int(s));
            } else if parts[0] == "tmdb" {
                identity.tmdb_id = parts.get(1).and_then(|s| non_empty(s));
                identity.season = parts.get(2).and_then(|s| leading_int(s));
                identity.episode = parts.get(3).and_then(|s| leading_int(s));
            }
        }
    }

    identity
}

/// Strip a `tmdb:` prefix if present.
pub fn strip_tmdb_prefix(id: &str) -> &str {
    id.strip_prefix(TMDB_PREFIX).unwrap_or(id)
}

/// Parse the leading decimal digits of `s`, ignoring leading whitespace and
/// an optional `+`. `"12abc"` → 12, `"abc"` → `None`.
pub(crate) fn leading_int(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imdb_movie() {
        let id = parse_catalog_id("tt1234567", MediaType::Movie);
        assert_eq!(id.imdb_id.as_deref(), Some("tt1234567"));
        assert_eq!(id.tmdb_id, None);
        assert!(!id.is_episode());
    }

    #[test]
    fn tmdb_movie() {
        let id = parse_catalog_id("tmdb:42", MediaType::Movie);
        assert_eq!(id.tmdb_id.as_deref(), Some("42"));
        assert_eq!(id.imdb_id, None);
    }

    #[test]
    fn imdb_episode() {
        let id = parse_catalog_id("tt1234567:1:5", MediaType::Series);
        assert_eq!(id.imdb_id.as_deref(), Some("tt1234567"));
        assert_eq!(id.season, Some(1));
        assert_eq!(id.episode, Some(5));
    }

    #[test]
    fn tmdb_episode() {
        let id = parse_catalog_id("tmdb:42:2:10", MediaType::Series);
        assert_eq!(id.tmdb_id.as_deref(), Some("42"));
        assert_eq!(id.season, Some(2));
        assert_eq!(id.episode, Some(10));
    }

    #[test]
    fn season_zero_is_a_season() {
        let id = parse_catalog_id("tt1234567:0:3", MediaType::Series);
        assert_eq!(id.season, Some(0));
        assert_eq!(id.episode, Some(3));
        assert!(id.is_episode());

        let id = parse_catalog_id("tmdb:42:0:1", MediaType::Series);
        assert_eq!(id.season, Some(0));
        assert!(id.is_episode());
    }

    #[test]
    fn non_numeric_components_become_absent() {
        let id = parse_catalog_id("tt1234567:x:", MediaType::Series);
        assert_eq!(id.imdb_id.as_deref(), Some("tt1234567"));
        assert_eq!(id.season, None);
        assert_eq!(id.episode, None);

        let id = parse_catalog_id("tt7654321", MediaType::Series);
        assert_eq!(id.season, None);
    }

    #[test]
    fn unknown_prefix_is_empty() {
        assert_eq!(parse_catalog_id("kitsu:1", MediaType::Movie), RequestIdentity::default());
        assert_eq!(parse_catalog_id("kitsu:1:2", MediaType::Series), RequestIdentity::default());
        assert_eq!(parse_catalog_id("tmdb:", MediaType::Movie).tmdb_id, None);
    }

    #[test]
    fn leading_int_parsing() {
        assert_eq!(leading_int("12"), Some(12));
        assert_eq!(leading_int(" 7abc"), Some(7));
        assert_eq!(leading_int("1080p"), Some(1080));
        assert_eq!(leading_int("+3"), Some(3));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int("-1"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn media_type_round_trip() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("Series".parse::<MediaType>().unwrap(), MediaType::Series);
        assert!("anime".parse::<MediaType>().is_err());
        assert_eq!(MediaType::Series.to_string(), "series");
    }

    #[test]
    fn strips_tmdb_prefix() {
        assert_eq!(strip_tmdb_prefix("tmdb:603"), "603");
        assert_eq!(strip_tmdb_prefix("tt0133093"), "tt0133093");
    }
}
