//! Integration Tests Module
//!
//! End-to-end tests over dataset files on disk: load, analyse, cache.

pub mod cache_refresh;
