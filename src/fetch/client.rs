use super::retry::{is_retryable, RetryPolicy};
use crate::config::{RunContext, SourcesConfig};
use crate::errors::{AppError, AppResult, FetchError, FetchResult};
use crate::processor::{CAPABILITY_SOURCE, USAGE_SOURCE};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// The two source datasets the statistics are computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Wikimedia browser/OS view counts (TSV)
    Usage,
    /// SSL Labs client capabilities (JSON)
    Capability,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Usage => USAGE_SOURCE,
            Dataset::Capability => CAPABILITY_SOURCE,
        }
    }

    /// Dated destination inside the run's data directory
    pub fn path<'a>(&self, ctx: &'a RunContext) -> &'a Path {
        match self {
            Dataset::Usage => &ctx.usage_file,
            Dataset::Capability => &ctx.capability_file,
        }
    }
}

/// What happened to one dataset file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Downloaded { path: PathBuf, bytes: usize },
    /// Today's file was already on disk and was reused
    Skipped { path: PathBuf },
}

impl DownloadStatus {
    pub fn path(&self) -> &Path {
        match self {
            DownloadStatus::Downloaded { path, .. } | DownloadStatus::Skipped { path } => path,
        }
    }
}

/// `.part` sibling of a download target, removed on drop unless persisted
///
/// Covers failed writes as well as a download future dropped mid-write, for
/// example when the other dataset fails inside `try_join!`.
struct PartialFile {
    path: PathBuf,
    dest: PathBuf,
    persisted: bool,
}

impl PartialFile {
    fn new(dest: &Path) -> Self {
        Self {
            path: partial_path(dest),
            dest: dest.to_path_buf(),
            persisted: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(mut self) -> std::io::Result<()> {
        tokio::fs::rename(&self.path, &self.dest).await?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.persisted && self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Where an in-progress download of `dest` is written
fn partial_path(dest: &Path) -> PathBuf {
    dest.with_extension("part")
}

/// Async HTTP downloader for the source datasets
pub struct DatasetFetcher {
    client: reqwest::Client,
    sources: SourcesConfig,
    policy: RetryPolicy,
}

impl DatasetFetcher {
    pub fn new(sources: &SourcesConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(sources.timeout_seconds))
            .user_agent(concat!("tls-stats/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::ConnectionFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            sources: sources.clone(),
            policy: RetryPolicy::from_sources(sources),
        })
    }

    pub fn url(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Usage => &self.sources.usage_url,
            Dataset::Capability => &self.sources.capability_url,
        }
    }

    async fn fetch_once(&self, url: &str) -> FetchResult<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    timeout_seconds: self.sources.timeout_seconds,
                    url: url.to_string(),
                }
            } else {
                FetchError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    /// GET `url` with retries on transient failures
    pub async fn fetch_bytes(&self, url: &str) -> FetchResult<Vec<u8>> {
        let delays = self.policy.delays();
        let mut attempts = 0;

        loop {
            match self.fetch_once(url).await {
                Ok(body) => {
                    if attempts > 0 {
                        debug!("Fetched {} after {} attempts", url, attempts + 1);
                    }
                    return Ok(body);
                }
                Err(e) if !is_retryable(&e) => {
                    error!("Non-retryable failure fetching {}: {}", url, e);
                    return Err(e);
                }
                Err(e) => {
                    let Some(&backoff) = delays.get(attempts) else {
                        error!(
                            "Failed to fetch {} after {} attempts: {}",
                            url,
                            attempts + 1,
                            e
                        );
                        return Err(FetchError::MaxRetriesExceeded {
                            url: url.to_string(),
                        });
                    };
                    attempts += 1;
                    warn!(
                        "Fetch attempt {} failed for {}, retrying in {:?}: {}",
                        attempts, url, backoff, e
                    );
                    sleep(backoff).await;
                }
            }
        }
    }

    /// Download `url` into `dest`
    ///
    /// An existing file is refused unless `force` is set. The body is written
    /// to a `.part` sibling first and renamed into place, so an interrupted
    /// download never leaves a truncated dataset behind.
    pub async fn download(&self, url: &str, dest: &Path, force: bool) -> AppResult<DownloadStatus> {
        if !force && tokio::fs::try_exists(dest).await? {
            return Err(FetchError::AlreadyExists {
                path: dest.display().to_string(),
            }
            .into());
        }

        let leftover = partial_path(dest);
        if tokio::fs::try_exists(&leftover).await? {
            debug!("Removing leftover {}", leftover.display());
            tokio::fs::remove_file(&leftover).await?;
        }

        info!("Downloading {} to {}", url, dest.display());
        let body = self.fetch_bytes(url).await?;

        let partial = PartialFile::new(dest);
        tokio::fs::write(partial.path(), &body).await?;
        partial.persist().await?;

        debug!("Wrote {} bytes to {}", body.len(), dest.display());
        Ok(DownloadStatus::Downloaded {
            path: dest.to_path_buf(),
            bytes: body.len(),
        })
    }

    /// Download one dataset for the run; with `reuse_existing` an existing
    /// dated file is kept instead of refused
    pub async fn fetch_dataset(
        &self,
        ctx: &RunContext,
        dataset: Dataset,
        force: bool,
        reuse_existing: bool,
    ) -> AppResult<DownloadStatus> {
        let dest = dataset.path(ctx);
        if reuse_existing && !force && tokio::fs::try_exists(dest).await? {
            debug!("Reusing {} at {}", dataset.name(), dest.display());
            return Ok(DownloadStatus::Skipped {
                path: dest.to_path_buf(),
            });
        }

        self.download(self.url(dataset), dest, force)
            .await
            .map_err(|e| match e {
                AppError::Fetch(FetchError::AlreadyExists { .. }) => e,
                other => AppError::source_unavailable(dataset.name(), other),
            })
    }

    /// Download both datasets concurrently, refusing to overwrite today's
    /// files unless `force` is set
    pub async fn download_all(
        &self,
        ctx: &RunContext,
        force: bool,
    ) -> AppResult<(DownloadStatus, DownloadStatus)> {
        ctx.ensure_dirs()?;
        futures::try_join!(
            self.fetch_dataset(ctx, Dataset::Usage, force, false),
            self.fetch_dataset(ctx, Dataset::Capability, force, false),
        )
    }

    /// Make sure both of today's datasets are on disk, downloading only the
    /// missing ones
    pub async fn ensure_all(&self, ctx: &RunContext) -> AppResult<(DownloadStatus, DownloadStatus)> {
        ctx.ensure_dirs()?;
        futures::try_join!(
            self.fetch_dataset(ctx, Dataset::Usage, false, true),
            self.fetch_dataset(ctx, Dataset::Capability, false, true),
        )
    }
}
