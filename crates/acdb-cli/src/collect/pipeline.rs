//! Sequential acquisition pipeline: fetch, extract, persist, one code at a time.

use std::fmt;
use std::time::Duration;

use acdb_core::{AreaCode, AreaCodeRange};
use acdb_db::{DbError, LookupRunCounts, RunStatus, UpsertOutcome, AREA_CODES_TABLE};
use acdb_extract::{ExtractionService, RecordExtractor};
use acdb_scraper::PageFetcher;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

/// Timing and selection knobs for one run.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PipelineOptions {
    /// Cooldown after a failed candidate.
    pub backoff: Duration,
    /// Delay after every looked-up candidate except the last.
    pub pacing: Duration,
    /// Skip codes that already have a valid stored row.
    pub skip_recorded: bool,
}

impl PipelineOptions {
    pub(crate) fn from_app_config(config: &acdb_core::AppConfig, skip_recorded: bool) -> Self {
        Self {
            backoff: Duration::from_secs(config.backoff_secs),
            pacing: Duration::from_secs(config.pacing_secs),
            skip_recorded,
        }
    }
}

/// Where one candidate is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CandidateState {
    Pending,
    Fetching,
    Extracting,
    Persisting,
    Done,
    Skipped,
    Failed(String),
}

/// Totals for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub run_id: Option<i64>,
    /// Candidates that were attempted (not skipped).
    pub processed: usize,
    /// Persisted records that were informative.
    pub informative: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl RunSummary {
    fn writes(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }

    fn record_write(&mut self, outcome: UpsertOutcome, informative: bool) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
        if informative {
            self.informative += 1;
        }
    }

    fn ledger_counts(&self) -> LookupRunCounts {
        let to_i64 = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        LookupRunCounts {
            processed: to_i64(self.processed),
            informative: to_i64(self.informative),
            failed: to_i64(self.failed),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed {} ({} informative): {} inserted, {} updated, {} unchanged, \
             {} skipped, {} failed",
            self.processed,
            self.informative,
            self.inserted,
            self.updated,
            self.unchanged,
            self.skipped,
            self.failed
        )?;
        if self.cancelled {
            f.write_str(" [cancelled]")?;
        }
        Ok(())
    }
}

pub(crate) struct Pipeline<F, S> {
    pool: SqlitePool,
    fetcher: F,
    extractor: RecordExtractor<S>,
    options: PipelineOptions,
}

impl<F, S> Pipeline<F, S>
where
    F: PageFetcher,
    S: ExtractionService,
{
    pub(crate) fn new(
        pool: SqlitePool,
        fetcher: F,
        extractor: RecordExtractor<S>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            pool,
            fetcher,
            extractor,
            options,
        }
    }

    /// Evaluates every code in `range` in ascending order.
    ///
    /// A single candidate's fetch, extraction, or late store failure never
    /// ends the run. The run is aborted only when the `area_codes` table is
    /// missing or when a store write fails before any write has succeeded.
    /// `cancel` is honoured between candidates and during waits.
    ///
    /// # Errors
    ///
    /// Returns an error on the two abort conditions above.
    pub(crate) async fn run(
        &self,
        range: AreaCodeRange,
        cancel: &CancellationToken,
    ) -> anyhow::Result<RunSummary> {
        if !acdb_db::area_codes_table_exists(&self.pool).await? {
            return Err(DbError::MissingTable(AREA_CODES_TABLE).into());
        }

        let mut summary = RunSummary {
            run_id: self.open_ledger(&range).await,
            ..RunSummary::default()
        };

        let total = range.len();
        tracing::info!(range = %range, candidates = total, "starting area-code lookup run");

        for (index, code) in range.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let state = match self.process(code, &mut summary).await {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!(
                        code = %code,
                        error = %e,
                        "store write failed before any record was persisted; aborting run"
                    );
                    let message = format!("store unavailable at {code}: {e}");
                    self.fail_ledger(&summary, &message).await;
                    return Err(anyhow::Error::new(e).context(message));
                }
            };

            if index + 1 == total {
                break;
            }

            // A skipped candidate made no requests, so there is nothing to pace.
            if state == CandidateState::Skipped {
                continue;
            }

            let mut delay = self.options.pacing;
            if let CandidateState::Failed(reason) = &state {
                tracing::info!(
                    code = %code,
                    reason = %reason,
                    backoff_secs = self.options.backoff.as_secs(),
                    "backing off after failure"
                );
                delay = delay.saturating_add(self.options.backoff);
            }
            if !wait_unless_cancelled(delay, cancel).await {
                summary.cancelled = true;
                break;
            }
        }

        if summary.cancelled {
            tracing::warn!(summary = %summary, "lookup run cancelled");
        } else {
            tracing::info!(summary = %summary, "lookup run finished");
        }
        self.close_ledger(&summary).await;

        Ok(summary)
    }

    /// Runs one candidate to a terminal state.
    ///
    /// Returns `Err` only for a store failure while nothing has been written yet.
    async fn process(
        &self,
        code: AreaCode,
        summary: &mut RunSummary,
    ) -> Result<CandidateState, DbError> {
        let mut state = CandidateState::Pending;

        if self.options.skip_recorded && self.already_recorded(code).await {
            transition(code, &mut state, CandidateState::Skipped);
            summary.skipped += 1;
            return Ok(state);
        }

        summary.processed += 1;

        transition(code, &mut state, CandidateState::Fetching);
        let page = match self.fetcher.fetch(code).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "lookup page fetch failed");
                summary.failed += 1;
                transition(code, &mut state, CandidateState::Failed(e.to_string()));
                return Ok(state);
            }
        };

        transition(code, &mut state, CandidateState::Extracting);
        let record = match self.extractor.extract(code, &page).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "extraction service failed");
                summary.failed += 1;
                transition(code, &mut state, CandidateState::Failed(e.to_string()));
                return Ok(state);
            }
        };

        transition(code, &mut state, CandidateState::Persisting);
        let valid = record.is_informative();
        match acdb_db::upsert_code_record(&self.pool, &record, valid).await {
            Ok(outcome) => {
                tracing::info!(
                    code = %code,
                    valid,
                    in_use = record.in_use(),
                    assignable = record.assignable(),
                    location = record.location(),
                    country = record.country(),
                    outcome = ?outcome,
                    "area code recorded"
                );
                summary.record_write(outcome, valid);
                transition(code, &mut state, CandidateState::Done);
            }
            Err(e) if summary.writes() == 0 => {
                summary.failed += 1;
                return Err(e);
            }
            Err(e) => {
                tracing::error!(code = %code, error = %e, "failed to persist area code");
                summary.failed += 1;
                transition(code, &mut state, CandidateState::Failed(e.to_string()));
            }
        }

        Ok(state)
    }

    async fn already_recorded(&self, code: AreaCode) -> bool {
        match acdb_db::get_area_code(&self.pool, code).await {
            Ok(row) => row.is_some_and(|r| r.valid),
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "existing-row check failed; looking up anyway");
                false
            }
        }
    }

    async fn open_ledger(&self, range: &AreaCodeRange) -> Option<i64> {
        match acdb_db::start_lookup_run(&self.pool, range).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "failed to record lookup run start");
                None
            }
        }
    }

    async fn close_ledger(&self, summary: &RunSummary) {
        let Some(run_id) = summary.run_id else {
            return;
        };
        let status = if summary.cancelled {
            RunStatus::Cancelled
        } else {
            RunStatus::Succeeded
        };
        if let Err(e) =
            acdb_db::complete_lookup_run(&self.pool, run_id, status, summary.ledger_counts()).await
        {
            tracing::error!(run_id, error = %e, "failed to mark lookup run as {status}");
        }
    }

    async fn fail_ledger(&self, summary: &RunSummary, message: &str) {
        let Some(run_id) = summary.run_id else {
            return;
        };
        if let Err(e) =
            acdb_db::fail_lookup_run(&self.pool, run_id, message, summary.ledger_counts()).await
        {
            tracing::error!(run_id, error = %e, "failed to mark lookup run as failed");
        }
    }
}

fn transition(code: AreaCode, state: &mut CandidateState, next: CandidateState) {
    tracing::debug!(code = %code, from = ?state, to = ?next, "candidate state");
    *state = next;
}

/// Sleeps for `delay`, returning `false` if `cancel` fires first.
async fn wait_unless_cancelled(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
