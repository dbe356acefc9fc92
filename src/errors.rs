use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Dataset download operations
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TSV processing
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Failure inside the aggregation workers
    #[error("Processing error: {0}")]
    Processing(String),

    /// A required input dataset could not be obtained; aborts the run
    #[error("Source unavailable: {source_name} - {reason}")]
    SourceUnavailable { source_name: String, reason: String },
}

/// Dataset fetch error types
#[derive(Error, Debug)]
pub enum FetchError {
    /// Could not reach the remote host
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timed out
    #[error("Request timeout: {timeout_seconds}s for {url}")]
    Timeout { timeout_seconds: u64, url: String },

    /// Retry limit exceeded
    #[error("Max retries exceeded: {url}")]
    MaxRetriesExceeded { url: String },

    /// Target file already present and no forced download requested
    #[error("Downloading file {path}, which already exists. Use --force to force download")]
    AlreadyExists { path: String },
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Config(format!("TOML export failed: {}", err))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::HttpStatus {
                status: status.as_u16(),
                url: err
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "<unknown>".to_string()),
            },
            None => FetchError::ConnectionFailed(err.to_string()),
        }
    }
}

impl AppError {
    /// Build a [`AppError::SourceUnavailable`] for the named dataset
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        AppError::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
