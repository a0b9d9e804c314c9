//! State module for tracking crawl progress
//!
//! This module provides the shared state workers and the coordinator use
//! during a crawl run.
//!
//! # Components
//!
//! - `VisitedSet`: Every URL ever admitted, with exactly-once admission
//! - `Frontier`: The unbounded queue of admitted URLs waiting to be fetched

mod frontier;
mod visited;

// Re-export main types
pub use frontier::{Frontier, FrontierReceiver};
pub use visited::VisitedSet;
