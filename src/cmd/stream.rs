use std::sync::Arc;

use anyhow::Result;

use cinemaos::{Config, IdCache, MediaType, StreamHandler, StreamRequest};

pub async fn cmd_stream(config: &Config, media_type: MediaType, id: &str) -> Result<()> {
    let handler = StreamHandler::from_config(config, Arc::new(IdCache::new()))?;
    let request = StreamRequest {
        media_type,
        catalog_id: id.to_string(),
    };

    eprintln!("🎬 Resolving {media_type} {id}");
    let response = handler.handle(&request).await;
    eprintln!("📺 {} streams", response.streams.len());

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
