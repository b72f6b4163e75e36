//! Job Browser Server
//!
//! Loads job listings from the remote API, keeps bookmarks on disk
//! and serves both to UI clients over HTTP using Axum.

mod args;

use anyhow::Context;
use args::Cli;
use browser::{BookmarkStore, BrowserConfig, JobsManager, api};
use clap::Parser;
use fetcher::HttpJobSource;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config =
        BrowserConfig::load_or_default(cli.config.as_deref()).context("failed to load config")?;
    cli.apply(&mut config);

    println!("🚀 Starting Job Browser...\n");
    println!("📡 Job source: {}", config.api.base_url);

    let source = HttpJobSource::with_timeout(&config.api.base_url, config.request_timeout())
        .context("failed to build HTTP client")?;
    let bookmarks = BookmarkStore::open(config.storage.backend, &config.storage.data_dir);
    println!(
        "💾 Bookmarks: {:?} backend ({:?})",
        bookmarks.backend(),
        config.storage.data_dir
    );

    let manager = Arc::new(JobsManager::new(source, bookmarks));

    // Serve right away; the first page shows up as `loading` until it lands.
    tokio::spawn({
        let manager = manager.clone();
        async move {
            manager.initialize().await;
            let session = manager.snapshot();
            println!(
                "📊 Loaded {} jobs and {} bookmarks",
                session.jobs.len(),
                session.bookmarked_jobs.len()
            );
        }
    });

    let app = api::router(manager);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.addr))?;
    println!("🌐 Server running at http://{}", config.server.addr);
    println!("   Try: curl 'http://{}/jobs'\n", config.server.addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
