//! Configuration module for Sumi-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawling with {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FrontierConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_seed, validate, MAX_REQUEST_TIMEOUT_SECS, MAX_WORKERS};

use crate::ConfigResult;
use url::Url;

impl Config {
    /// Returns the configured seeds as parsed URLs, in configuration order
    pub fn seed_urls(&self) -> ConfigResult<Vec<Url>> {
        self.frontier.seeds.iter().map(|s| parse_seed(s)).collect()
    }
}
