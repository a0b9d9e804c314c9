//! URL handling module for Sumi-Crawl
//!
//! Turns the raw `href` values found on a page into absolute, fetchable
//! URLs. URLs are compared by their serialized form only: no trailing-slash,
//! default-port or query-order folding is applied.

mod resolve;

pub use resolve::{is_crawlable_scheme, resolve_link, resolve_links};
