use std::sync::Arc;

use anyhow::Result;

use cinemaos::{CinemetaClient, Config, IdCache, IdentityResolver, MediaType};

pub async fn cmd_resolve(config: &Config, media_type: MediaType, id: &str) -> Result<()> {
    let metadata = CinemetaClient::new(&config.metadata_url, config.metadata_timeout())?;
    let resolver = IdentityResolver::new(Arc::new(metadata), Arc::new(IdCache::new()));

    let resolution = resolver.resolve(id, media_type).await;
    if resolution.identity.tmdb_id.is_none() {
        eprintln!("⚠️  No TMDB id found for {id}");
    }

    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}
