//! Dataset loaders and the compute pipeline

pub mod capability_loader;
pub mod pipeline;
pub mod usage_loader;

pub use capability_loader::{load_capabilities, parse_capabilities, CAPABILITY_SOURCE};
pub use pipeline::{PipelineInputs, StatsPipeline};
pub use usage_loader::{apply_window, load_usage, read_usage, USAGE_SOURCE};

use crate::types::statistics::LoadStats;

/// Records parsed from one dataset plus the load counters
#[derive(Debug, Clone)]
pub struct LoadedDataset<T> {
    pub records: Vec<T>,
    pub stats: LoadStats,
}
