//! Job listing dump
//!
//! Walks the listing API page by page and saves every job it finds
//! to a JSON file (data/jobs.json by default).

use anyhow::Context;
use clap::Parser;
use common::Job;
use fetcher::{HttpJobSource, JobSource, DEFAULT_BASE_URL};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fetcher")]
#[command(about = "Download job listings to a JSON file", long_about = None)]
struct Args {
    /// Listing endpoint
    #[arg(long = "api-url", env = "JOB_BROWSER_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Stop after this many pages even if more are available
    #[arg(long = "max-pages", default_value = "5")]
    max_pages: u32,

    /// Output file
    #[arg(short = 'o', long = "out", default_value = "data/jobs.json")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!("🔍 Fetching job listings from {}\n", args.api_url);

    let source = HttpJobSource::new(&args.api_url);
    let mut jobs: Vec<Job> = Vec::new();

    for page in 1..=args.max_pages {
        let batch = source
            .fetch_page(page)
            .await
            .with_context(|| format!("failed to fetch page {}", page))?;

        if batch.is_empty() {
            println!("📭 Page {} is empty, no more jobs", page);
            break;
        }

        println!("📋 Page {}: {} jobs", page, batch.len());
        jobs.extend(batch);
    }

    println!("📊 Total jobs fetched: {}", jobs.len());

    if let Some(dir) = args.out.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let json_output = serde_json::to_string_pretty(&jobs).context("failed to serialize jobs")?;
    fs::write(&args.out, json_output)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    println!("💾 Saved {} jobs to {:?}", jobs.len(), args.out);
    Ok(())
}
