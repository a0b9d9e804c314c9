use crate::CrawlError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use url::Url;

/// Producer side of the crawl frontier
///
/// The frontier is an unbounded queue: pushing never waits for capacity, no
/// matter how many links a page yields. There is exactly one producer handle;
/// dropping it (or calling [`Frontier::close`]) closes the queue, after which
/// consumers drain what is left and then see `None`.
#[derive(Debug)]
pub struct Frontier {
    tx: mpsc::UnboundedSender<Url>,
    queued: Arc<AtomicUsize>,
}

/// Consumer side of the crawl frontier
///
/// Cheap to clone; every worker holds one. Each pushed URL is handed to
/// exactly one consumer.
#[derive(Debug, Clone)]
pub struct FrontierReceiver {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Url>>>,
    queued: Arc<AtomicUsize>,
}

impl Frontier {
    /// Creates an empty, open frontier
    pub fn new() -> (Self, FrontierReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let queued = Arc::new(AtomicUsize::new(0));

        let frontier = Self {
            tx,
            queued: Arc::clone(&queued),
        };
        let receiver = FrontierReceiver {
            rx: Arc::new(Mutex::new(rx)),
            queued,
        };
        (frontier, receiver)
    }

    /// Appends a URL to the frontier
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The URL is queued
    /// * `Err(CrawlError::FrontierClosed)` - Every consumer is gone
    pub fn push(&self, url: Url) -> crate::Result<()> {
        self.queued.fetch_add(1, Ordering::SeqCst);
        self.tx.send(url).map_err(|e| {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            CrawlError::FrontierClosed(e.0.to_string())
        })
    }

    /// Number of URLs pushed but not yet popped
    pub fn len(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Returns whether no URL is waiting to be popped
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closes the frontier by dropping its only sender
    ///
    /// This is equivalent to dropping the `Frontier`; it only adds a log
    /// line. Consumers keep receiving URLs that were already queued; once
    /// those are gone every `pop` returns `None`.
    pub fn close(self) {
        tracing::debug!("Closing frontier with {} queued URL(s)", self.len());
    }
}

impl FrontierReceiver {
    /// Takes the next URL, waiting until one is available
    ///
    /// Returns `None` once the frontier is closed and drained.
    pub async fn pop(&self) -> Option<Url> {
        let url = self.rx.lock().await.recv().await;
        if url.is_some() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
        }
        url
    }
}
