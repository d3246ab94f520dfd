//! Read-only commands over the store: `show`, `list`, and `runs`.

use acdb_core::AreaCode;
use acdb_db::{AreaCodeRow, LookupRunRow};
use chrono::SecondsFormat;

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn format_row(row: &AreaCodeRow) -> String {
    format!(
        "{:<4} {:<5} {:<6} {:<10} {:<7} {}",
        row.code,
        yes_no(row.valid),
        yes_no(row.in_use),
        yes_no(row.assignable),
        row.country,
        row.location
    )
}

fn format_run(run: &LookupRunRow) -> String {
    let completed = run.completed_at.map_or_else(
        || "-".to_string(),
        |t| t.to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    let mut line = format!(
        "#{:<4} {:<9} {}..={} started {} completed {} processed {} informative {} failed {}",
        run.id,
        run.status,
        run.range_start,
        run.range_end,
        run.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        completed,
        run.candidates_processed,
        run.informative_records,
        run.failed_candidates
    );
    if let Some(message) = &run.error_message {
        line.push_str(" error: ");
        line.push_str(message);
    }
    line
}

/// Prints the stored record for `code`.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub(crate) async fn show(pool: &sqlx::SqlitePool, code: AreaCode) -> anyhow::Result<()> {
    let Some(row) = acdb_db::get_area_code(pool, code).await? else {
        println!("area code {code} has not been looked up");
        return Ok(());
    };

    println!("code:        {}", row.code);
    println!("valid:       {}", yes_no(row.valid));
    println!("in use:      {}", yes_no(row.in_use));
    println!("assignable:  {}", yes_no(row.assignable));
    println!("location:    {}", row.location);
    println!("country:     {}", row.country);
    if let Some(reason) = &row.reason {
        println!("reason:      {reason}");
    }
    println!(
        "checked at:  {}",
        row.checked_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!(
        "first seen:  {}",
        row.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    Ok(())
}

/// Prints stored records in code order, followed by totals.
///
/// # Errors
///
/// Returns an error if a store query fails.
pub(crate) async fn list(
    pool: &sqlx::SqlitePool,
    valid_only: bool,
    limit: i64,
) -> anyhow::Result<()> {
    let rows = acdb_db::list_area_codes(pool, valid_only, limit).await?;
    let counts = acdb_db::count_area_codes(pool).await?;

    println!(
        "{:<4} {:<5} {:<6} {:<10} {:<7} LOCATION",
        "CODE", "VALID", "IN USE", "ASSIGNABLE", "COUNTRY"
    );
    for row in &rows {
        println!("{}", format_row(row));
    }
    println!(
        "{} shown; {} stored, {} valid, {} in use",
        rows.len(),
        counts.total,
        counts.valid,
        counts.in_use
    );
    Ok(())
}

/// Prints the most recent lookup runs, newest first.
///
/// # Errors
///
/// Returns an error if the store query fails.
pub(crate) async fn runs(pool: &sqlx::SqlitePool, limit: i64) -> anyhow::Result<()> {
    let runs = acdb_db::list_lookup_runs(pool, limit).await?;
    if runs.is_empty() {
        println!("no lookup runs recorded");
        return Ok(());
    }
    for run in &runs {
        println!("{}", format_run(run));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn row() -> AreaCodeRow {
        AreaCodeRow {
            code: "212".to_string(),
            location: "New York City".to_string(),
            country: "US".to_string(),
            assignable: false,
            in_use: true,
            valid: true,
            reason: None,
            checked_at: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn format_row_aligns_columns() {
        assert_eq!(
            format_row(&row()),
            "212  yes   yes    no         US      New York City"
        );
    }

    #[test]
    fn format_run_includes_error_message() {
        let run = LookupRunRow {
            id: 3,
            status: "failed".to_string(),
            range_start: "200".to_string(),
            range_end: "299".to_string(),
            started_at: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
            completed_at: None,
            candidates_processed: 1,
            informative_records: 0,
            failed_candidates: 1,
            error_message: Some("store unavailable".to_string()),
        };
        let line = format_run(&run);
        assert!(line.starts_with("#3    failed    200..=299 started 2026-10-16T12:00:00Z"));
        assert!(line.contains("completed -"));
        assert!(line.ends_with("error: store unavailable"));
    }

    #[tokio::test]
    async fn commands_succeed_against_empty_store() {
        let pool = acdb_db::connect_in_memory().await.unwrap();
        show(&pool, "212".parse().unwrap()).await.unwrap();
        list(&pool, true, 10).await.unwrap();
        runs(&pool, 10).await.unwrap();
    }
}
