use super::capability_loader::load_capabilities;
use super::usage_loader::load_usage;
use super::LoadedDataset;
use crate::analysis::{AnalysisRun, StatisticsEngine};
use crate::cache::{CacheManager, CacheOutcome, ReportStore};
use crate::config::RunContext;
use crate::errors::AppResult;
use crate::fetch::DatasetFetcher;
use crate::types::{CapabilityProfile, UsageRecord};
use tracing::info;

/// Both datasets for one run, parsed
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub usage: LoadedDataset<UsageRecord>,
    pub capabilities: LoadedDataset<CapabilityProfile>,
}

/// Fetch → load → join/aggregate → report, for one [`RunContext`]
pub struct StatsPipeline<'n> {
    ctx: RunContext,
    engine: StatisticsEngine<'n>,
}

impl StatsPipeline<'static> {
    pub fn new(ctx: RunContext) -> Self {
        let engine = StatisticsEngine::new().workers(ctx.workers);
        Self { ctx, engine }
    }
}

impl<'n> StatsPipeline<'n> {
    pub fn with_engine(ctx: RunContext, engine: StatisticsEngine<'n>) -> Self {
        Self { ctx, engine }
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Parse today's dataset files; a missing or unreadable file is fatal
    pub fn load(&self) -> AppResult<PipelineInputs> {
        let usage = load_usage(&self.ctx.usage_file)?;
        let capabilities = load_capabilities(&self.ctx.capability_file)?;
        Ok(PipelineInputs {
            usage,
            capabilities,
        })
    }

    /// Compute from the dataset files already on disk
    pub fn analyse(&self) -> AppResult<AnalysisRun> {
        let inputs = self.load()?;
        self.analyse_inputs(&inputs)
    }

    pub fn analyse_inputs(&self, inputs: &PipelineInputs) -> AppResult<AnalysisRun> {
        info!(
            "Analysing {} usage records against {} client profiles",
            inputs.usage.records.len(),
            inputs.capabilities.records.len()
        );
        self.engine.run(
            &inputs.usage.records,
            &inputs.capabilities.records,
            self.ctx.today,
        )
    }

    /// Download whichever of today's datasets are missing (all of them when
    /// `force` is set), then compute
    pub async fn fetch_and_analyse(
        &self,
        fetcher: &DatasetFetcher,
        force: bool,
    ) -> AppResult<AnalysisRun> {
        if force {
            fetcher.download_all(&self.ctx, true).await?;
        } else {
            fetcher.ensure_all(&self.ctx).await?;
        }
        self.analyse()
    }

    /// Serve the cached report, or refresh it through this pipeline
    ///
    /// A forced refresh downloads both datasets before the current report is
    /// archived, so a failed download leaves the current report in place.
    pub async fn cached_report<S: ReportStore>(
        &self,
        cache: &mut CacheManager<S>,
        fetcher: &DatasetFetcher,
        force: bool,
    ) -> AppResult<CacheOutcome> {
        if force {
            fetcher.download_all(&self.ctx, true).await?;
        }

        let pipeline = self;
        cache
            .get_report(force, move || async move {
                pipeline
                    .fetch_and_analyse(fetcher, false)
                    .await
                    .map(|run| run.report)
            })
            .await
    }
}
