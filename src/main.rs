//! `cinemaos` CLI - resolve catalog ids into CinemaOS streams

mod cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use cinemaos::{Config, MediaType};

#[derive(Parser)]
#[command(name = "cinemaos")]
#[command(about = "Resolve movie and episode ids into playable CinemaOS streams")]
#[command(version)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.config/cinemaos/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the stream provider base URL
    #[arg(long, global = true)]
    provider_url: Option<String>,

    /// Override the metadata service base URL
    #[arg(long, global = true)]
    metadata_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve streams for a catalog id and print them as JSON
    Stream {
        /// Media type (movie or series)
        media_type: MediaType,

        /// Catalog id (tt1234567, tmdb:42, tt1234567:1:5, tmdb:42:1:5)
        id: String,
    },

    /// Resolve a catalog id into TMDB/IMDB ids, title and year
    Resolve {
        /// Media type (movie or series)
        media_type: MediaType,

        /// Catalog id
        id: String,
    },

    /// Compute the provider request token
    Sign {
        #[arg(long)]
        tmdb: Option<String>,

        #[arg(long)]
        imdb: Option<String>,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,
    },

    /// Decrypt a provider response (or bare envelope) and print its sources
    Decrypt {
        /// JSON file to read, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON.
    let default_level = if cli.verbose { "debug" } else { "info" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Stream { media_type, id } => {
            let config = load_config(cli.config, cli.provider_url, cli.metadata_url)?;
            cmd::stream::cmd_stream(&config, media_type, &id).await?;
        }
        Commands::Resolve { media_type, id } => {
            let config = load_config(cli.config, cli.provider_url, cli.metadata_url)?;
            cmd::resolve::cmd_resolve(&config, media_type, &id).await?;
        }
        Commands::Sign {
            tmdb,
            imdb,
            season,
            episode,
        } => {
            cmd::sign::cmd_sign(tmdb, imdb, season, episode, cli.verbose);
        }
        Commands::Decrypt { input } => {
            cmd::decrypt::cmd_decrypt(&input)?;
        }
    }

    Ok(())
}

fn load_config(
    path: Option<PathBuf>,
    provider_url: Option<String>,
    metadata_url: Option<String>,
) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    if let Some(url) = provider_url {
        config.provider_url = url;
    }
    if let Some(url) = metadata_url {
        config.metadata_url = url;
    }
    Ok(config)
}
