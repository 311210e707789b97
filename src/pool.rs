use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use crate::config::ScrapeConfig;
use crate::fetcher::PageFetcher;
use crate::pipeline::{self, PageOutcome};
use crate::writer::RecordWriter;

/// Totals over every page of a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub discovered: usize,
    pub saved: usize,
    pub missing: usize,
    pub write_errors: usize,
}

impl RunSummary {
    fn add(&mut self, outcome: &PageOutcome) {
        self.pages += 1;
        self.discovered += outcome.discovered;
        self.saved += outcome.saved;
        self.missing += outcome.missing;
        self.write_errors += outcome.write_errors;
    }
}

/// Run the page pipeline for pages `1..=total_pages`, at most `workers` at a time.
pub async fn run(config: &ScrapeConfig) -> Result<RunSummary> {
    config.validate()?;
    let fetcher = PageFetcher::new(config.base_url()?, config.timeout())?;
    let writer = RecordWriter::new(&config.results_dir);
    writer
        .ensure_dir()
        .with_context(|| format!("creating {}", writer.dir().display()))?;

    Ok(run_pages(fetcher, writer, config.total_pages, config.workers).await)
}

async fn run_pages(
    fetcher: PageFetcher,
    writer: RecordWriter,
    total_pages: usize,
    workers: usize,
) -> RunSummary {
    let mut summary = RunSummary::default();
    if total_pages == 0 {
        info!("No pages to scrape");
        return summary;
    }

    let fetcher = Arc::new(fetcher);
    let writer = Arc::new(writer);
    let workers = workers.max(1);

    let pb = ProgressBar::new(total_pages as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({per_sec}, eta {eta})")
    {
        pb.set_style(style.progress_chars("=> "));
    }

    // Workers send outcomes; the channel closes once every task has finished.
    let (tx, mut rx) = mpsc::channel::<PageOutcome>(workers * 2);
    let dispatcher = tokio::spawn(dispatch(total_pages, workers, tx, move |page| {
        let fetcher = Arc::clone(&fetcher);
        let writer = Arc::clone(&writer);
        async move { pipeline::scrape_page(&fetcher, &writer, page).await }
    }));

    while let Some(outcome) = rx.recv().await {
        info!(
            "page {} done: {} urls, {} saved, {} missing, {} write errors",
            outcome.page, outcome.discovered, outcome.saved, outcome.missing, outcome.write_errors
        );
        summary.add(&outcome);
        pb.inc(1);
    }

    if let Err(e) = dispatcher.await {
        error!("page dispatcher failed: {}", e);
    }

    pb.finish_and_clear();
    info!(
        "Scraped {} pages ({} records saved, {} missing, {} write errors)",
        summary.pages, summary.saved, summary.missing, summary.write_errors
    );
    summary
}

/// Spawn `job` for pages `1..=total_pages`. A page is only spawned once a
/// permit is free, so at most `workers` tasks exist at any time.
async fn dispatch<F, Fut>(total_pages: usize, workers: usize, tx: mpsc::Sender<PageOutcome>, job: F)
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = PageOutcome> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();

    for page in 1..=total_pages {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        let fut = job(page);
        let tx = tx.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let outcome = fut.await;
            let _ = tx.send(outcome).await;
        });

        while let Some(res) = tasks.try_join_next() {
            log_join(res);
        }
    }

    drop(tx);
    while let Some(res) = tasks.join_next().await {
        log_join(res);
    }
}

fn log_join(res: std::result::Result<(), JoinError>) {
    if let Err(e) = res {
        error!("page task failed: {}", e);
    }
}
