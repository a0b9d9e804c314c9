//! Output module for crawl summaries
//!
//! This module handles:
//! - Accumulating per-URL results into a [`CrawlReport`]
//! - Rendering the report for the command line

mod report;

pub use report::{print_report, render_report, CrawlReport};
