//! TLS Adoption Statistics
//!
//! Estimates how widely TLS protocol versions, cipher suites and elliptic
//! curves are supported by real web visitors, by weighting a client
//! capability catalogue with browser usage shares.

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fetch;
pub mod processor;
pub mod types;
pub mod utils;
