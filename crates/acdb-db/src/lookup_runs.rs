//! Database operations for the `lookup_runs` ledger.
//!
//! Each `collect` invocation records one row: opened as `running`, closed as
//! `succeeded`, `cancelled`, or `failed` with the run's counters.

use std::fmt;

use acdb_core::AreaCodeRange;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

const SELECT_COLUMNS: &str = "id, status, range_start, range_end, started_at, completed_at, \
     candidates_processed, informative_records, failed_candidates, error_message";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Lifecycle status of a lookup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl RunStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters written when a run closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupRunCounts {
    pub processed: i64,
    pub informative: i64,
    pub failed: i64,
}

/// A row from the `lookup_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LookupRunRow {
    pub id: i64,
    pub status: String,
    pub range_start: String,
    pub range_end: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub candidates_processed: i64,
    pub informative_records: i64,
    pub failed_candidates: i64,
    pub error_message: Option<String>,
}

// ---------------------------------------------------------------------------
// lookup_runs operations
// ---------------------------------------------------------------------------

/// Opens a new run in `running` status for `range` and returns its `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn start_lookup_run(pool: &SqlitePool, range: &AreaCodeRange) -> Result<i64, DbError> {
    let result = sqlx::query(
        "INSERT INTO lookup_runs (status, range_start, range_end, started_at) \
         VALUES ('running', ?, ?, ?)",
    )
    .bind(range.start().to_string())
    .bind(range.end().to_string())
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Closes a `running` run with `status` (normally `succeeded` or `cancelled`)
/// and records its counters.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn complete_lookup_run(
    pool: &SqlitePool,
    id: i64,
    status: RunStatus,
    counts: LookupRunCounts,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE lookup_runs \
         SET status = ?, completed_at = ?, candidates_processed = ?, \
             informative_records = ?, failed_candidates = ? \
         WHERE id = ? AND status = 'running'",
    )
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(counts.processed)
    .bind(counts.informative)
    .bind(counts.failed)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a `running` run as `failed` with `error_message` and its counters so far.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn fail_lookup_run(
    pool: &SqlitePool,
    id: i64,
    error_message: &str,
    counts: LookupRunCounts,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE lookup_runs \
         SET status = 'failed', completed_at = ?, error_message = ?, \
             candidates_processed = ?, informative_records = ?, failed_candidates = ? \
         WHERE id = ? AND status = 'running'",
    )
    .bind(Utc::now())
    .bind(error_message)
    .bind(counts.processed)
    .bind(counts.informative)
    .bind(counts.failed)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_lookup_run(pool: &SqlitePool, id: i64) -> Result<LookupRunRow, DbError> {
    let row = sqlx::query_as::<_, LookupRunRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM lookup_runs WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` runs, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_lookup_runs(pool: &SqlitePool, limit: i64) -> Result<Vec<LookupRunRow>, DbError> {
    let rows = sqlx::query_as::<_, LookupRunRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM lookup_runs ORDER BY started_at DESC, id DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
