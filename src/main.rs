use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackshelf::artwork::{ArtworkCache, DirectoryStore, PngCodec};
use trackshelf::backfill::{spawn_worker, Decision, WorkerEvent};
use trackshelf::config::AppConfig;
use trackshelf::resolver::{CatalogClient, ReqwestTransport, ResolutionEngine};
use trackshelf::store;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trackshelf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    tracing::info!("Loading playlist from {}", config.playlist_path.display());
    let records = store::load(&config.playlist_path)
        .with_context(|| format!("reading {}", config.playlist_path.display()))?;

    let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
    let catalog = CatalogClient::with_base_url(Arc::clone(&transport), &config.catalog_url);
    let artwork = ArtworkCache::new(
        transport,
        Arc::new(PngCodec),
        Arc::new(DirectoryStore::new(&config.artwork_dir)),
    );
    let engine = ResolutionEngine::new(catalog)
        .with_artwork(artwork)
        .with_config(config.resolver_config());

    let mut handle = spawn_worker(Arc::new(engine), records);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    while let Some(event) = handle.events.recv().await {
        match event {
            WorkerEvent::Progress {
                position,
                total,
                title,
                artist,
            } => {
                println!("[{}/{}] {} - {}", position, total, artist, title);
            }
            WorkerEvent::Review { proposal, reply } => {
                let found = &proposal.resolved;
                println!("  album: {} -> {}", proposal.current.album, found.album);
                println!("  genre: {} -> {}", proposal.current.genre, found.genre);
                println!("  year:  {} -> {}", proposal.current.year, found.year);
                if let Some(path) = &found.artwork_path {
                    println!("  cover: {}", path.display());
                }
                println!("  apply? [y/N]");

                let answer = stdin.next_line().await?.unwrap_or_default();
                let decision = if answer.trim().eq_ignore_ascii_case("y") {
                    Decision::Accept
                } else {
                    Decision::Reject
                };
                // The worker treats a closed channel as a rejection
                let _ = reply.send(decision);
            }
            WorkerEvent::NotFound { title, artist } => {
                println!("  no match for {} - {}", artist, title);
            }
        }
    }

    let (records, summary) = handle.join().await?;

    if summary.updated > 0 {
        store::save(&config.playlist_path, &records)?;
        tracing::info!("Saved {} records", records.len());
    }

    println!(
        "{} updated, {} rejected, {} not found",
        summary.updated,
        summary.rejected,
        summary.not_found.len()
    );
    for (title, artist) in &summary.not_found {
        println!("  {} - {}", artist, title);
    }

    Ok(())
}
