use super::{load_config, run_context, write_output_to_file};
use crate::analysis::{OutputFormat, ReportFormatter};
use crate::cache::{CacheManager, FsReportStore, RefreshReason};
use crate::errors::AppResult;
use crate::fetch::DatasetFetcher;
use crate::processor::StatsPipeline;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Show the current TLS support report, recomputing it when missing or stale
#[derive(Args)]
pub struct ReportCommand {
    /// Archive the current report and recompute from freshly downloaded data
    #[arg(short, long)]
    force: bool,

    /// Output format (console or json)
    #[arg(long, default_value = "console")]
    format: String,

    /// Write the formatted report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ReportCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== TLS Stats - Report ===");
        let config = load_config();
        let pipeline = StatsPipeline::new(run_context(&config));
        let ctx = pipeline.context();
        ctx.ensure_dirs()?;

        let fetcher = DatasetFetcher::new(&config.sources)?;
        let mut cache = CacheManager::new(
            FsReportStore::new(&ctx.stats_dir),
            ctx.today,
            ctx.staleness_months,
        );

        let outcome = pipeline
            .cached_report(&mut cache, &fetcher, self.force)
            .await?;

        match outcome.refreshed {
            None => info!("Using cached report"),
            Some(RefreshReason::Missing) => info!("No usable cached report, computed a new one"),
            Some(reason) => info!("Recomputed report ({:?})", reason),
        }
        if let Some(archive) = &outcome.archived {
            info!("Previous report archived at {}", archive.display());
        }

        let formatted =
            ReportFormatter::format_statistics(&outcome.report, &OutputFormat::parse(&self.format))?;
        match &self.output {
            Some(path) => write_output_to_file(path, &formatted, "Report")?,
            None => print!("{}", formatted),
        }
        Ok(())
    }
}
