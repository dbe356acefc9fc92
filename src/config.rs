use chrono::NaiveDate;
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Wikimedia OS and browser view counts
pub const DEFAULT_USAGE_URL: &str =
    "https://analytics.wikimedia.org/datasets/periodic/reports/metrics/browser/all_sites_by_os_and_browser.tsv";

/// SSL Labs client cipher and protocol support information
pub const DEFAULT_CAPABILITY_URL: &str = "https://api.ssllabs.com/api/v3/getClients";

/// Date format shared by dataset filenames, archive names and the TSV source
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub sources: SourcesConfig,
    pub cache: CacheConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root directory holding `data/` and `stats/`
    pub home: PathBuf,
}

/// Remote dataset locations and download behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub usage_url: String,
    pub capability_url: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            usage_url: DEFAULT_USAGE_URL.to_string(),
            capability_url: DEFAULT_CAPABILITY_URL.to_string(),
            timeout_seconds: 120,
            max_retries: 3,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Age in calendar months after which the current report is stale
    pub staleness_months: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            staleness_months: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Join workers; 1 runs the sequential path
    pub workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// `~/.tls-stats`, or `.tls-stats` relative to the working directory when no
/// home directory is known
pub fn default_home() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".tls-stats"),
        _ => PathBuf::from(".tls-stats"),
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let sources = SourcesConfig::default();
        let config = Config::builder()
            .set_default("paths.home", default_home().to_string_lossy().to_string())?
            .set_default("sources.usage_url", sources.usage_url)?
            .set_default("sources.capability_url", sources.capability_url)?
            .set_default("sources.timeout_seconds", sources.timeout_seconds)?
            .set_default("sources.max_retries", sources.max_retries as i64)?
            .set_default("sources.initial_backoff_ms", sources.initial_backoff_ms)?
            .set_default("sources.backoff_multiplier", sources.backoff_multiplier)?
            .set_default("sources.max_backoff_seconds", sources.max_backoff_seconds)?
            .set_default(
                "cache.staleness_months",
                CacheConfig::default().staleness_months as i64,
            )?
            .set_default(
                "processing.workers",
                ProcessingConfig::default().workers as i64,
            )?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // TLS_STATS_SOURCES__TIMEOUT_SECONDS etc.
            .add_source(
                config::Environment::with_prefix("TLS_STATS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        // Short form for the most commonly overridden setting
        if let Ok(home) = env::var("TLS_STATS_HOME") {
            app_config.paths.home = PathBuf::from(home);
        }

        if app_config.cache.staleness_months == 0 {
            return Err(ConfigError::Message(
                "cache.staleness_months must be at least 1".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// Get default config values, falling back to built-ins when loading fails
    pub fn get_defaults() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(_) => Self {
                paths: PathsConfig {
                    home: default_home(),
                },
                sources: SourcesConfig::default(),
                cache: CacheConfig::default(),
                processing: ProcessingConfig::default(),
            },
        }
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Explicit per-run context: every path and the notion of "today" the
/// pipeline needs, so nothing downstream reads ambient process state.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory holding the current report and its archives
    pub stats_dir: PathBuf,
    /// Directory holding downloaded datasets
    pub data_dir: PathBuf,
    /// Dated usage TSV (`browser-stats-{today}.tsv`)
    pub usage_file: PathBuf,
    /// Dated capability JSON (`device-ciphers-{today}.json`)
    pub capability_file: PathBuf,
    /// Current report artifact (`tls-stats-current.json`)
    pub current_report: PathBuf,
    /// Date stamped on generated reports and used for staleness checks
    pub today: NaiveDate,
    pub staleness_months: u32,
    pub workers: usize,
}

impl RunContext {
    /// Derive the run context for `today` from the loaded configuration
    pub fn new(config: &AppConfig, today: NaiveDate) -> Self {
        let stats_dir = config.paths.home.join("stats");
        let data_dir = config.paths.home.join("data");
        let stamp = today.format(DATE_FORMAT).to_string();

        Self {
            usage_file: data_dir.join(format!("browser-stats-{}.tsv", stamp)),
            capability_file: data_dir.join(format!("device-ciphers-{}.json", stamp)),
            current_report: stats_dir.join("tls-stats-current.json"),
            stats_dir,
            data_dir,
            today,
            staleness_months: config.cache.staleness_months,
            workers: config.processing.workers.max(1),
        }
    }

    /// Create the data and stats directories if they do not exist
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.stats_dir)?;
        std::fs::create_dir_all(&self.data_dir)
    }
}
