mod config;
mod error;
mod fetcher;
mod parser;
mod pipeline;
mod pool;
mod record;
mod writer;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use crate::config::ScrapeConfig;

#[derive(Parser)]
#[command(
    name = "movie_scraper",
    about = "Scrape movie index and detail pages into JSON files"
)]
struct Cli {
    /// Number of index pages to scrape, starting at page 1
    #[arg(short = 'n', long)]
    pages: Option<usize>,
    /// Pages scraped concurrently (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,
    /// Directory the JSON records are written to
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Site root the index pages hang off
    #[arg(long)]
    base_url: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl Cli {
    fn apply(self, mut config: ScrapeConfig) -> ScrapeConfig {
        if let Some(pages) = self.pages {
            config.total_pages = pages;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(output) = self.output {
            config.results_dir = output;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let config = cli.apply(ScrapeConfig::from_env()?);
    tracing::debug!(?config, "Starting scrape");

    let summary = pool::run(&config).await?;
    println!(
        "Done: {} pages, {} detail urls, {} saved ({} missing, {} write errors).",
        summary.pages, summary.discovered, summary.saved, summary.missing, summary.write_errors
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
