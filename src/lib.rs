//! Sumi-Crawl: a bounded-concurrency web crawler
//!
//! This crate starts from a set of seed URLs, fetches every page with a fixed
//! pool of workers, follows the links it finds and stops once no unvisited
//! URL remains reachable.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl engine operations
///
/// Per-page failures are not represented here; they travel inside a
/// [`crawler::CrawlResult`] as a [`PageError`].
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Frontier closed while {0} was still being scheduled")]
    FrontierClosed(String),

    #[error("All workers exited with {outstanding} unit(s) of work outstanding")]
    WorkersExited { outstanding: usize },

    #[error("Outstanding work counter would drop below zero")]
    CounterUnderflow,

    #[error("Worker task failed: {0}")]
    WorkerPanicked(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failures of the fetch step for a single URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    BodyRead { url: String, message: String },
}

/// Failures turning a fetched body into a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },
}

/// Any failure that ends the processing of one URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl PageError {
    /// Short, stable name of the failure class, used for reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(FetchError::Network { .. }) => "network",
            Self::Fetch(FetchError::HttpStatus { .. }) => "http-status",
            Self::Fetch(FetchError::BodyRead { .. }) => "body-read",
            Self::Parse(ParseError::NotHtml { .. }) => "parse",
        }
    }
}

/// Result type alias for crawl engine operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlResult, HttpFetcher, PageFetcher};
pub use output::CrawlReport;
pub use state::{Frontier, VisitedSet};
pub use crate::url::resolve_links;
