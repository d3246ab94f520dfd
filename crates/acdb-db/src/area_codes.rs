//! Database operations for the `area_codes` table.
//!
//! One row per area code, keyed by the three-digit code string. The table is a
//! "latest observation" cache: each persisted lookup overwrites the previous
//! values for its code.

use acdb_core::{AreaCode, CodeRecord};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

pub const AREA_CODES_TABLE: &str = "area_codes";

const SELECT_COLUMNS: &str =
    "code, location, country, assignable, in_use, valid, reason, checked_at, created_at";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `area_codes` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AreaCodeRow {
    pub code: String,
    pub location: String,
    pub country: String,
    pub assignable: bool,
    pub in_use: bool,
    /// `true` when the stored lookup produced an informative record.
    pub valid: bool,
    pub reason: Option<String>,
    /// When the code was last looked up, whether or not the values changed.
    pub checked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl AreaCodeRow {
    /// Parses the stored key back into an [`AreaCode`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MalformedCode`] if the stored key is not three digits.
    pub fn area_code(&self) -> Result<AreaCode, DbError> {
        self.code
            .parse()
            .map_err(|_| DbError::MalformedCode(self.code.clone()))
    }

    /// Whether persisting `record` with `valid` would leave this row's values as they are.
    fn holds(&self, record: &CodeRecord, valid: bool) -> bool {
        self.location == record.location()
            && self.country == record.country()
            && self.assignable == record.assignable()
            && self.in_use == record.in_use()
            && self.valid == valid
            && self.reason.as_deref() == record.reason()
    }
}

/// What [`upsert_code_record`] did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row existed for the code; one was created.
    Inserted,
    /// A row existed with different values; it was overwritten in place.
    Updated,
    /// A row existed with the same values; only `checked_at` moved.
    Unchanged,
}

/// Row totals for the `area_codes` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct AreaCodeCounts {
    pub total: i64,
    pub valid: i64,
    pub in_use: i64,
}

// ---------------------------------------------------------------------------
// area_codes operations
// ---------------------------------------------------------------------------

/// Returns `true` if the `area_codes` table exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the catalog query fails.
pub async fn area_codes_table_exists(pool: &SqlitePool) -> Result<bool, DbError> {
    crate::table_exists(pool, AREA_CODES_TABLE).await
}

/// Returns `true` if a row for `code` is already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn code_exists(pool: &SqlitePool, code: AreaCode) -> Result<bool, DbError> {
    let found: Option<i64> =
        sqlx::query_scalar::<_, i64>("SELECT 1 FROM area_codes WHERE code = ?")
            .bind(code.to_string())
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Fetches the stored row for `code`, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_area_code(
    pool: &SqlitePool,
    code: AreaCode,
) -> Result<Option<AreaCodeRow>, DbError> {
    let row = sqlx::query_as::<_, AreaCodeRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM area_codes WHERE code = ?"
    ))
    .bind(code.to_string())
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts or updates the row for `record.code()`.
///
/// Runs in one transaction: look up the existing row, then insert a new row,
/// overwrite `location`, `country`, `assignable`, `in_use`, `valid`, and
/// `reason` in place, or, when nothing differs, only refresh `checked_at`.
/// Later observations always replace earlier ones, including an empty record
/// replacing an informative one.
///
/// A failed existence check is logged and treated as "not found"; the insert
/// that follows then fails on the primary key if a row really exists, so a
/// storage fault is never silently swallowed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert, update, or commit fails.
pub async fn upsert_code_record(
    pool: &SqlitePool,
    record: &CodeRecord,
    valid: bool,
) -> Result<UpsertOutcome, DbError> {
    let code = record.code().to_string();
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let existing = match sqlx::query_as::<_, AreaCodeRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM area_codes WHERE code = ?"
    ))
    .bind(&code)
    .fetch_optional(&mut *tx)
    .await
    {
        Ok(row) => row,
        Err(e) => {
            tracing::warn!(
                code = %code,
                error = %e,
                "existence check failed; attempting insert"
            );
            None
        }
    };

    let outcome = match existing {
        None => {
            sqlx::query(
                "INSERT INTO area_codes \
                     (code, location, country, assignable, in_use, valid, reason, \
                      checked_at, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&code)
            .bind(record.location())
            .bind(record.country())
            .bind(record.assignable())
            .bind(record.in_use())
            .bind(valid)
            .bind(record.reason())
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
            UpsertOutcome::Inserted
        }
        Some(row) if row.holds(record, valid) => {
            sqlx::query("UPDATE area_codes SET checked_at = ? WHERE code = ?")
                .bind(now)
                .bind(&code)
                .execute(&mut *tx)
                .await?;
            UpsertOutcome::Unchanged
        }
        Some(_) => {
            sqlx::query(
                "UPDATE area_codes SET \
                     location   = ?, \
                     country    = ?, \
                     assignable = ?, \
                     in_use     = ?, \
                     valid      = ?, \
                     reason     = ?, \
                     checked_at = ? \
                 WHERE code = ?",
            )
            .bind(record.location())
            .bind(record.country())
            .bind(record.assignable())
            .bind(record.in_use())
            .bind(valid)
            .bind(record.reason())
            .bind(now)
            .bind(&code)
            .execute(&mut *tx)
            .await?;
            UpsertOutcome::Updated
        }
    };

    tx.commit().await?;
    Ok(outcome)
}

/// Returns stored rows in ascending code order, at most `limit` of them.
///
/// When `valid_only` is set, rows from empty lookups are excluded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_area_codes(
    pool: &SqlitePool,
    valid_only: bool,
    limit: i64,
) -> Result<Vec<AreaCodeRow>, DbError> {
    let rows = sqlx::query_as::<_, AreaCodeRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM area_codes \
         WHERE (? = 0 OR valid = 1) \
         ORDER BY code ASC \
         LIMIT ?"
    ))
    .bind(valid_only)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Counts stored rows overall, with `valid = 1`, and with `in_use = 1`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_area_codes(pool: &SqlitePool) -> Result<AreaCodeCounts, DbError> {
    let counts = sqlx::query_as::<_, AreaCodeCounts>(
        "SELECT COUNT(*) AS total, \
                COALESCE(SUM(valid), 0) AS valid, \
                COALESCE(SUM(in_use), 0) AS in_use \
         FROM area_codes",
    )
    .fetch_one(pool)
    .await?;
    Ok(counts)
}
