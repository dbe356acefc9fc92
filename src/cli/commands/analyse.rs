use super::{load_config, run_context, write_output_to_file};
use crate::analysis::{OutputFormat, ReportFormatter};
use crate::errors::AppResult;
use crate::processor::StatsPipeline;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Recompute statistics from today's local dataset files without touching
/// the cached report
#[derive(Args)]
pub struct AnalyseCommand {
    /// Output format (console or json)
    #[arg(long, default_value = "console")]
    format: String,

    /// Unmatched usage keys to list, heaviest first
    #[arg(long, default_value = "20")]
    top_unmatched: usize,

    /// Join worker threads (overrides config.toml)
    #[arg(long)]
    workers: Option<usize>,

    /// Write the output to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl AnalyseCommand {
    pub fn run(&self) -> AppResult<()> {
        info!("=== TLS Stats - Analyse ===");
        let mut config = load_config();
        if let Some(workers) = self.workers {
            config.processing.workers = workers;
        }
        let ctx = run_context(&config);

        let pipeline = StatsPipeline::new(ctx);
        let inputs = pipeline.load()?;
        let run = pipeline.analyse_inputs(&inputs)?;

        let format = OutputFormat::parse(&self.format);
        let formatted = match format {
            OutputFormat::Console => {
                let mut out = String::new();
                out.push_str(&format!(
                    "Loaded {} usage records ({} malformed, {} outside window), {} client profiles ({} rejected)\n\n",
                    ReportFormatter::format_number(inputs.usage.stats.records_loaded),
                    ReportFormatter::format_number(inputs.usage.stats.malformed_records),
                    ReportFormatter::format_number(inputs.usage.stats.outside_window),
                    ReportFormatter::format_number(inputs.capabilities.stats.records_loaded),
                    ReportFormatter::format_number(inputs.capabilities.stats.malformed_records),
                ));
                out.push_str(&ReportFormatter::format_join_diagnostics(
                    &run.outcome,
                    self.top_unmatched,
                    &format,
                )?);
                out.push('\n');
                out.push_str(&ReportFormatter::format_statistics(&run.report, &format)?);
                out
            }
            OutputFormat::Json => {
                ReportFormatter::format_analysis(&run, self.top_unmatched)?
            }
        };

        match &self.output {
            Some(path) => write_output_to_file(path, &formatted, "Analysis")?,
            None => print!("{}", formatted),
        }
        Ok(())
    }
}
