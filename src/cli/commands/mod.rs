pub mod analyse;
pub mod config;
pub mod fetch;
pub mod report;

use crate::config::{AppConfig, RunContext};
use crate::errors::AppResult;
use chrono::{NaiveDate, Utc};
use std::path::Path;
use tracing::{info, warn};

/// Load configuration, falling back to built-in defaults
pub fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}", e);
            info!("Using default configuration");
            AppConfig::get_defaults()
        }
    }
}

/// Today's date, the only place the CLI reads the clock
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Run context for today from the loaded configuration
pub fn run_context(config: &AppConfig) -> RunContext {
    RunContext::new(config, today())
}

/// Write output to file with safe directory creation
pub fn write_output_to_file(path: &Path, content: &str, description: &str) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    println!("{} written to: {}", description, path.display());
    Ok(())
}
