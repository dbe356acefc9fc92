//! TLS Adoption Statistics - Type System
//!
//! - `usage`: Browser/OS usage-share records (UsageRecord)
//! - `capability`: Client TLS capability profiles (CapabilityProfile)
//! - `tally`: Weighted aggregation results and join diagnostics
//! - `report`: Persisted statistics report (StatisticsReport, ReportEntry)
//! - `statistics`: Loader counters

mod capability;
mod report;
pub mod statistics;
mod tally;
mod usage;

pub use capability::*;
pub use report::*;
pub use tally::*;
pub use usage::*;
