use super::{load_config, run_context};
use crate::errors::AppResult;
use crate::fetch::{DatasetFetcher, DownloadStatus};
use clap::Args;
use tracing::info;

/// Download today's source datasets
#[derive(Args)]
pub struct FetchCommand {
    /// Overwrite today's dataset files if already downloaded
    #[arg(short, long)]
    force: bool,
}

impl FetchCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== TLS Stats - Fetch ===");
        let config = load_config();
        let ctx = run_context(&config);

        let fetcher = DatasetFetcher::new(&config.sources)?;
        let (usage, capability) = fetcher.download_all(&ctx, self.force).await?;

        for status in [usage, capability] {
            match status {
                DownloadStatus::Downloaded { path, bytes } => {
                    println!("Downloaded {} ({} bytes)", path.display(), bytes)
                }
                DownloadStatus::Skipped { path } => println!("Kept {}", path.display()),
            }
        }
        Ok(())
    }
}
