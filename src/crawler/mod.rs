//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] trait
//! - HTML parsing and link extraction
//! - The worker pool that turns frontier entries into results
//! - Overall crawl coordination and termination detection

mod completion;
mod coordinator;
mod fetcher;
mod parser;
mod worker;

pub use completion::CompletionTracker;
pub use coordinator::{run_crawl, CancelHandle, Coordinator};
pub use fetcher::{
    build_http_client, FetchedPage, HttpFetcher, PageFetcher, DEFAULT_REQUEST_TIMEOUT,
};
pub use parser::{discover_links, extract_links, parse_page};
pub use worker::{process_url, CrawlResult};
