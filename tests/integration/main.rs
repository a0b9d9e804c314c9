//! Integration tests for Sumi-Crawl

mod crawl_tests;
