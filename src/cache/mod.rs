//! Staleness-aware report cache
//!
//! - **Store** - where the current report and its archives live ([`ReportStore`])
//! - **Manager** - fresh/stale/missing classification and the
//!   archive-then-recompute policy ([`CacheManager`])

pub mod manager;
pub mod store;

pub use manager::{CacheDecision, CacheManager, CacheOutcome, CacheState, RefreshReason};
pub use store::{archive_file_name, FsReportStore, ReportStore, CURRENT_REPORT_FILE};
