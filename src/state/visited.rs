use std::collections::{BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Set of every URL admitted to the crawl
///
/// Admission is the only mutation and happens under a single lock, so the
/// check and the insert cannot be interleaved by another caller. Entries are
/// never removed; the set lives for one crawl run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    admitted: Mutex<HashSet<Url>>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a URL if it has never been admitted before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not yet admitted and now is; the caller owns
    ///   scheduling it
    /// * `false` - Some earlier call already admitted this URL
    pub fn try_admit(&self, url: &Url) -> bool {
        let mut admitted = self.lock();
        if admitted.contains(url) {
            return false;
        }
        admitted.insert(url.clone())
    }

    /// Returns true if the URL has been admitted
    pub fn contains(&self, url: &Url) -> bool {
        self.lock().contains(url)
    }

    /// Number of admitted URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no URL has been admitted yet
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies the admitted URLs into a sorted set
    pub fn snapshot(&self) -> BTreeSet<Url> {
        self.lock().iter().cloned().collect()
    }

    // Insert is the only mutation, so a poisoned set is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashSet<Url>> {
        self.admitted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
