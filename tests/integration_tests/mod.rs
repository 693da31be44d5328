//! Integration tests module
//!
//! End-to-end tests of a harvest run: link discovery, dedup against the
//! progress store, extraction, publishing and counter bookkeeping.

pub mod error_scenarios;
pub mod fixtures;
pub mod http_run_test;
pub mod pipeline_test;
