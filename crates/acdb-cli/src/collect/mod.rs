//! The `collect` command: build the concrete collaborators and drive the pipeline.

mod pipeline;

use acdb_core::{AppConfig, AreaCode, AreaCodeRange};
use acdb_extract::{OpenAiClient, RecordExtractor};
use acdb_scraper::NanpaClient;
use anyhow::Context;
use clap::Args;
use tokio_util::sync::CancellationToken;

pub(crate) use pipeline::{Pipeline, PipelineOptions, RunSummary};

/// Arguments for `collect`.
#[derive(Debug, Clone, Args)]
pub(crate) struct CollectArgs {
    /// First area code to look up (defaults to ACDB_RANGE_START)
    #[arg(long, value_name = "CODE")]
    pub from: Option<AreaCode>,

    /// Last area code to look up, inclusive (defaults to ACDB_RANGE_END)
    #[arg(long, value_name = "CODE")]
    pub to: Option<AreaCode>,

    /// Skip codes that already have a valid stored record
    #[arg(long)]
    pub skip_recorded: bool,

    /// Print the range that would be looked up without fetching or writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CollectArgs {
    /// The range for this run: CLI flags first, configuration otherwise.
    pub(crate) fn range(&self, config: &AppConfig) -> AreaCodeRange {
        AreaCodeRange::new(
            self.from.unwrap_or(config.range.start()),
            self.to.unwrap_or(config.range.end()),
        )
    }
}

/// Prints what a `collect` run would do. Touches neither the network nor the database.
pub(crate) fn print_dry_run(config: &AppConfig, args: &CollectArgs) {
    let range = args.range(config);
    println!(
        "dry-run: would look up {} area codes in {range} (skip recorded: {}, pacing {}s, backoff {}s)",
        range.len(),
        args.skip_recorded,
        config.pacing_secs,
        config.backoff_secs,
    );
}

/// Runs the acquisition pipeline over the configured range.
///
/// # Errors
///
/// Returns an error if `OPENAI_API_KEY` is unset, a client cannot be built,
/// the `area_codes` table is missing, or the store fails before the first write.
pub(crate) async fn run_collect(
    pool: &sqlx::SqlitePool,
    config: &AppConfig,
    args: &CollectArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<RunSummary> {
    let range = args.range(config);
    if range.is_empty() {
        anyhow::bail!("empty range {range}: --from must not be greater than --to");
    }

    let api_key = config
        .openai_api_key
        .as_deref()
        .context("OPENAI_API_KEY must be set to run collect")?;

    let fetcher = NanpaClient::from_config(config).context("failed to build lookup client")?;
    let service =
        OpenAiClient::from_config(config, api_key).context("failed to build extraction client")?;
    let extractor = RecordExtractor::new(service, config.extract_max_parse_attempts);

    let pipeline = Pipeline::new(
        pool.clone(),
        fetcher,
        extractor,
        PipelineOptions::from_app_config(config, args.skip_recorded),
    );
    pipeline.run(range, cancel).await
}
