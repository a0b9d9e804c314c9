//! Crawl workers
//!
//! Every worker runs the same loop: take a URL from the frontier, fetch it,
//! extract and resolve its links, and publish one [`CrawlResult`]. Workers
//! never decide admission and never touch the outstanding count; both belong
//! to the coordinator.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::discover_links;
use crate::state::FrontierReceiver;
use crate::PageError;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use url::Url;

/// Outcome of processing one frontier entry
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The URL taken from the frontier
    pub url: Url,
    /// URL the response was served from, after redirects
    pub final_url: Option<Url>,
    /// HTTP status, when a response was received
    pub status_code: Option<u16>,
    /// Absolute http(s) links found on the page, in document order
    pub links: Vec<Url>,
    /// Why processing stopped early, if it did
    pub error: Option<PageError>,
}

impl CrawlResult {
    /// Returns true if the page was fetched and parsed
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Fetches one URL and turns the response into a [`CrawlResult`]
///
/// Any failure ends processing of this URL only; the result then carries the
/// error and no links.
pub async fn process_url<F: PageFetcher>(fetcher: &F, url: Url) -> CrawlResult {
    let page = match fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            return CrawlResult {
                url,
                final_url: None,
                status_code: None,
                links: Vec::new(),
                error: Some(e.into()),
            }
        }
    };

    match discover_links(&page) {
        Ok(links) => CrawlResult {
            url,
            final_url: Some(page.final_url),
            status_code: Some(page.status_code),
            links,
            error: None,
        },
        Err(e) => CrawlResult {
            url,
            final_url: Some(page.final_url),
            status_code: Some(page.status_code),
            links: Vec::new(),
            error: Some(e.into()),
        },
    }
}

/// Runs one worker until the frontier closes or the crawl is cancelled
pub(crate) async fn run_worker<F: PageFetcher>(
    id: usize,
    fetcher: Arc<F>,
    frontier: FrontierReceiver,
    results: mpsc::Sender<CrawlResult>,
    mut cancel: watch::Receiver<bool>,
) {
    tracing::debug!("Worker {} started", id);
    let mut handled = 0usize;

    loop {
        let url = tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => break,
            next = frontier.pop() => match next {
                Some(url) => url,
                None => break,
            },
        };

        tracing::trace!("Worker {} fetching {}", id, url);
        let result = tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => break,
            result = process_url(fetcher.as_ref(), url) => result,
        };

        let sent = tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => break,
            sent = results.send(result) => sent,
        };
        if sent.is_err() {
            tracing::debug!("Worker {} cannot publish results, shutting down", id);
            break;
        }
        handled += 1;
    }

    tracing::debug!("Worker {} finished after {} URL(s)", id, handled);
}

/// Resolves once the cancel flag is raised
///
/// A dropped sender means nobody can cancel any more, so this then never
/// resolves.
pub(crate) async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
