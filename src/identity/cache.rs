//! Process-lifetime IMDB → TMDB mapping cache.

use dashmap::DashMap;
use tracing::debug;

use super::MediaType;

/// Concurrent id-mapping cache keyed by `(imdb_id, media_type)`.
///
/// Only successful resolutions are stored. Entries are never evicted; a
/// racing double insert writes the same value twice.
#[derive(Debug, Default)]
pub struct IdCache {
    entries: DashMap<(String, MediaType), String>,
}

impl IdCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, imdb_id: &str, media_type: MediaType) -> Option<String> {
        self.entries
            .get(&(imdb_id.to_string(), media_type))
            .map(|entry| entry.value().clone())
    }

    pub fn put(&self, imdb_id: &str, media_type: MediaType, tmdb_id: &str) {
        debug!(imdb_id, %media_type, tmdb_id, "Caching TMDB mapping");
        self.entries
            .insert((imdb_id.to_string(), media_type), tmdb_id.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn keyed_by_media_type() {
        let cache = IdCache::new();
        cache.put("tt0903747", MediaType::Series, "1396");
        assert_eq!(cache.get("tt0903747", MediaType::Series).as_deref(), Some("1396"));
        assert_eq!(cache.get("tt0903747", MediaType::Movie), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_writers() {
        let cache = Arc::new(IdCache::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let imdb = format!("tt{}", i % 4);
                cache.put(&imdb, MediaType::Movie, &(i % 4).to_string());
                cache.get(&imdb, MediaType::Movie)
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(cache.len(), 4);
    }
}
