//! Outstanding-work accounting for termination detection
//!
//! The count is the number of frontier entries whose result has not been
//! fully processed yet. The coordinator increments it *before* pushing a URL
//! and decrements it only *after* every child of a result has been pushed, so
//! it can read zero only when no URL is queued, being fetched, or waiting in
//! the results stream.

use crate::CrawlError;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counter of enqueued-but-unresolved units of crawl work
#[derive(Debug, Default)]
pub struct CompletionTracker {
    outstanding: AtomicUsize,
}

impl CompletionTracker {
    /// Creates a tracker with no outstanding work
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one newly enqueued unit of work
    ///
    /// Must happen before the corresponding URL becomes visible in the
    /// frontier. Returns the new outstanding count.
    pub fn track(&self) -> usize {
        self.outstanding.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records that one unit of work, including all of its children, is done
    ///
    /// # Returns
    ///
    /// * `Ok(remaining)` - The outstanding count after this resolution;
    ///   `0` means the crawl is complete
    /// * `Err(CrawlError::CounterUnderflow)` - More resolutions than units
    ///   tracked; the count is left at zero
    pub fn resolve(&self) -> crate::Result<usize> {
        self.outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|previous| previous - 1)
            .map_err(|_| CrawlError::CounterUnderflow)
    }

    /// Current outstanding count
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Returns true when no work is outstanding
    pub fn is_complete(&self) -> bool {
        self.outstanding() == 0
    }
}
