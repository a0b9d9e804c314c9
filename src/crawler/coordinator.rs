//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier
//! - Spawning the worker pool
//! - Admitting discovered URLs and keeping the outstanding count
//! - Detecting completion and shutting the workers down
//! - Cooperative cancellation

use crate::config::CrawlerConfig;
use crate::crawler::completion::CompletionTracker;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::worker::{cancelled, run_worker, CrawlResult};
use crate::output::CrawlReport;
use crate::state::{Frontier, VisitedSet};
use crate::CrawlError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use url::Url;

/// Handle used to stop a running crawl from outside
///
/// Cancelling makes workers abandon in-flight fetches and makes the
/// coordinator return a report flagged as cancelled.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Requests cancellation; repeated calls are harmless
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Main crawler coordinator structure
///
/// The coordinator is the only task that admits URLs, pushes to the
/// frontier, and updates the outstanding count. For every result it pushes
/// all newly admitted children, each counted before its push, and only then
/// resolves the parent. The count therefore reaches zero only when nothing is
/// queued, being fetched, or waiting to be processed.
///
/// A coordinator drives a single crawl run; its visited set and counter are
/// not reset between runs.
pub struct Coordinator<F: PageFetcher> {
    config: CrawlerConfig,
    fetcher: Arc<F>,
    visited: Arc<VisitedSet>,
    tracker: Arc<CompletionTracker>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (worker count, buffers, ...)
    /// * `fetcher` - Where pages come from
    pub fn new(config: CrawlerConfig, fetcher: F) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            config,
            fetcher: Arc::new(fetcher),
            visited: Arc::new(VisitedSet::new()),
            tracker: Arc::new(CompletionTracker::new()),
            cancel_tx: Arc::new(cancel_tx),
        }
    }

    /// Returns a handle that can cancel this coordinator's crawl
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    /// The visited set shared with this crawl
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Current number of unresolved units of work
    pub fn outstanding(&self) -> usize {
        self.tracker.outstanding()
    }

    /// Runs a crawl from the given seeds until no work is left
    ///
    /// This method:
    /// 1. Spawns the worker pool
    /// 2. Admits and queues every seed
    /// 3. Drains results, admitting and queueing discovered links
    /// 4. Closes the frontier and results stream once nothing is outstanding
    /// 5. Waits for every worker to exit
    ///
    /// Per-URL failures are part of the report, not errors.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl finished or was cancelled
    /// * `Err(CrawlError)` - The engine itself failed
    pub async fn run(&self, seeds: Vec<Url>) -> crate::Result<CrawlReport> {
        let start_time = Instant::now();
        let workers = self.config.workers.max(1);
        tracing::info!(
            "Starting crawl with {} worker(s) and {} seed(s)",
            workers,
            seeds.len()
        );

        let (frontier, frontier_rx) = Frontier::new();
        let (results_tx, mut results_rx) = mpsc::channel(self.config.result_buffer.max(1));

        let mut pool = JoinSet::new();
        for id in 0..workers {
            pool.spawn(run_worker(
                id,
                Arc::clone(&self.fetcher),
                frontier_rx.clone(),
                results_tx.clone(),
                self.cancel_tx.subscribe(),
            ));
        }
        // Workers hold the only remaining senders and receivers
        drop(results_tx);
        drop(frontier_rx);

        let mut report = CrawlReport::new();
        let outcome = self
            .drive(seeds, &frontier, &mut results_rx, &mut pool, &mut report)
            .await;

        // Shutdown: closing the frontier releases idle workers, closing the
        // results stream releases any worker still trying to publish.
        frontier.close();
        results_rx.close();
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Worker task failed: {}", e);
            }
        }

        outcome?;

        report.visited = self.visited.snapshot();
        report.elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl {}: {} URL(s) handled in {:?}",
            if report.cancelled { "cancelled" } else { "completed" },
            report.handled,
            report.elapsed
        );
        Ok(report)
    }

    /// Seeds the frontier and drains results until completion or cancellation
    async fn drive(
        &self,
        seeds: Vec<Url>,
        frontier: &Frontier,
        results_rx: &mut mpsc::Receiver<CrawlResult>,
        pool: &mut JoinSet<()>,
        report: &mut CrawlReport,
    ) -> crate::Result<()> {
        for seed in seeds {
            if let Err(e) = self.admit(seed, frontier) {
                return self.unless_cancelled(e, report);
            }
        }

        if self.tracker.is_complete() {
            tracing::info!("No seeds admitted, nothing to crawl");
            return Ok(());
        }

        let mut cancel_rx = self.cancel_tx.subscribe();
        let started = Instant::now();

        loop {
            let result = tokio::select! {
                biased;
                _ = cancelled(&mut cancel_rx) => {
                    tracing::warn!(
                        "Crawl cancelled with {} unit(s) of work outstanding",
                        self.tracker.outstanding()
                    );
                    report.cancelled = true;
                    return Ok(());
                }
                // A failed worker loses its URL; the count can no longer reach zero
                Some(joined) = pool.join_next() => {
                    if let Err(e) = joined {
                        tracing::error!("Worker task failed: {}", e);
                        return Err(CrawlError::WorkerPanicked(e.to_string()));
                    }
                    continue;
                }
                received = results_rx.recv() => match received {
                    Some(result) => result,
                    None => {
                        return Err(CrawlError::WorkersExited {
                            outstanding: self.tracker.outstanding(),
                        });
                    }
                },
            };

            let remaining = match self.handle_result(result, frontier, report) {
                Ok(remaining) => remaining,
                Err(e) => return self.unless_cancelled(e, report),
            };

            if report.handled % self.config.progress_interval.max(1) == 0 {
                let rate = report.handled as f64 / started.elapsed().as_secs_f64().max(1e-3);
                tracing::info!(
                    "Progress: {} handled, {} outstanding, {} queued, {} visited, {:.2} pages/sec",
                    report.handled,
                    remaining,
                    frontier.len(),
                    self.visited.len(),
                    rate
                );
            }

            if remaining == 0 {
                tracing::debug!("Outstanding work reached zero");
                return Ok(());
            }
        }
    }

    /// Workers leave the frontier as soon as cancellation is requested, so a
    /// failed push during cancellation is not an engine fault.
    fn unless_cancelled(
        &self,
        error: CrawlError,
        report: &mut CrawlReport,
    ) -> crate::Result<()> {
        if *self.cancel_tx.borrow() {
            report.cancelled = true;
            return Ok(());
        }
        Err(error)
    }

    /// Processes one result: admit children, then resolve the parent
    ///
    /// Returns the outstanding count after the parent is resolved.
    fn handle_result(
        &self,
        result: CrawlResult,
        frontier: &Frontier,
        report: &mut CrawlReport,
    ) -> crate::Result<usize> {
        match &result.error {
            Some(error) => {
                tracing::warn!("Failed {}: {}", result.url, error);
            }
            None => {
                tracing::info!(
                    "Fetched {} ({} link(s))",
                    result.url,
                    result.links.len()
                );
                if self.config.follow_links {
                    for link in &result.links {
                        self.admit(link.clone(), frontier)?;
                    }
                }
            }
        }

        report.record(&result);
        self.tracker.resolve()
    }

    /// Admits a URL and, if it is new, counts it and queues it
    ///
    /// The count is raised before the push so the URL is accounted for by
    /// the time any worker can pop it.
    fn admit(&self, url: Url, frontier: &Frontier) -> crate::Result<bool> {
        if !self.visited.try_admit(&url) {
            tracing::trace!("Already admitted: {}", url);
            return Ok(false);
        }

        self.tracker.track();
        tracing::debug!("Queued {}", url);
        if let Err(e) = frontier.push(url) {
            // Never queued, so it must not stay counted
            self.tracker.resolve()?;
            return Err(e);
        }
        Ok(true)
    }
}

/// Runs a complete crawl with a fresh coordinator
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_crawl::config::{CrawlerConfig, UserAgentConfig};
/// use sumi_crawl::crawler::{run_crawl, HttpFetcher};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::from_config(&UserAgentConfig::default(), Duration::from_secs(5))?;
/// let seeds = vec![Url::parse("https://example.com/")?];
/// let report = run_crawl(CrawlerConfig::default(), fetcher, seeds).await?;
/// println!("Handled {} URLs", report.handled);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<F: PageFetcher>(
    config: CrawlerConfig,
    fetcher: F,
    seeds: Vec<Url>,
) -> crate::Result<CrawlReport> {
    Coordinator::new(config, fetcher).run(seeds).await
}
