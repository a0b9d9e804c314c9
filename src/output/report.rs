//! Crawl report accumulated by the coordinator
//!
//! The coordinator records every [`CrawlResult`] it drains; the final report
//! is returned from [`Coordinator::run`](crate::crawler::Coordinator::run)
//! and rendered by [`print_report`].

use crate::crawler::CrawlResult;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::time::Duration;
use url::Url;

/// Summary of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Number of results processed by the coordinator
    pub handled: usize,

    /// Results without an error
    pub succeeded: usize,

    /// Results carrying a fetch or parse error
    pub failed: usize,

    /// Total resolved links across all successful pages, duplicates included
    pub links_discovered: usize,

    /// Failure counts keyed by [`PageError::kind`](crate::PageError::kind)
    pub failures_by_kind: BTreeMap<String, usize>,

    /// Every URL admitted during the run
    pub visited: BTreeSet<Url>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// True if the run stopped because of cancellation
    pub cancelled: bool,
}

impl CrawlReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one processed result
    pub fn record(&mut self, result: &CrawlResult) {
        self.handled += 1;
        self.links_discovered += result.links.len();
        match &result.error {
            Some(error) => {
                self.failed += 1;
                *self
                    .failures_by_kind
                    .entry(error.kind().to_string())
                    .or_insert(0) += 1;
            }
            None => self.succeeded += 1,
        }
    }

    /// Percentage of handled URLs that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.handled > 0 {
            (self.succeeded as f64 / self.handled as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Renders a report as human-readable text
///
/// The last line is always `Handled N URLs`.
pub fn render_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Report ===\n");
    if report.cancelled {
        let _ = writeln!(out, "Crawl was cancelled before completion.\n");
    }

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  URLs visited: {}", report.visited.len());
    let _ = writeln!(out, "  Succeeded: {}", report.succeeded);
    let _ = writeln!(out, "  Failed: {}", report.failed);
    let _ = writeln!(out, "  Links discovered: {}", report.links_discovered);
    let _ = writeln!(out, "  Elapsed: {:.2}s", report.elapsed.as_secs_f64());
    let _ = writeln!(out);

    if !report.failures_by_kind.is_empty() {
        let _ = writeln!(out, "Failures by Kind:");
        let mut kinds: Vec<_> = report.failures_by_kind.iter().collect();
        kinds.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (kind, count) in kinds {
            let _ = writeln!(out, "  {}: {}", kind, count);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} URLs)",
        report.success_rate(),
        report.succeeded,
        report.handled
    );
    let _ = writeln!(out, "Handled {} URLs", report.handled);
    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", render_report(report));
}
