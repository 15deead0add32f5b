use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::chart::ChartRecord;
use crate::error::PipelineError;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Table names go into DDL verbatim, so only plain identifiers are accepted.
fn checked_table(table: &str) -> Result<&str, PipelineError> {
    let mut chars = table.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(table)
    } else {
        Err(PipelineError::TableName(table.to_string()))
    }
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE {table} (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            chart_rank    INTEGER,
            track_name    VARCHAR(255),
            artist        VARCHAR(255),
            daily_streams BIGINT,
            country       VARCHAR(50),
            scrape_date   DATE
        )"
    )
}

/// Replace `table` with exactly `records`, in order.
///
/// Rows are written into `<table>_staging` and swapped in within one
/// transaction, so a failure leaves the previous table as it was.
pub fn load_records(conn: &Connection, table: &str, records: &[ChartRecord]) -> Result<usize> {
    let table = checked_table(table)?;
    let staging = format!("{table}_staging");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {staging};\n{};",
        create_table_sql(&staging)
    ))?;

    let mut count = 0;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {staging}
             (chart_rank, track_name, artist, daily_streams, country, scrape_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        ))?;
        for r in records {
            count += stmt.execute(rusqlite::params![
                r.chart_rank,
                r.track_name,
                r.artist,
                r.daily_streams,
                r.country,
                r.scrape_date,
            ])?;
        }
    }
    debug!("Staged {} rows in {}", count, staging);

    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};
         ALTER TABLE {staging} RENAME TO {table};"
    ))?;
    tx.commit()?;

    info!("Loaded {} rows into {}", count, table);
    Ok(count)
}

/// Loaded rows in insertion order.
pub fn fetch_records(
    conn: &Connection,
    table: &str,
    limit: Option<usize>,
) -> Result<Vec<ChartRecord>> {
    let table = checked_table(table)?;
    let sql = format!(
        "SELECT chart_rank, track_name, artist, daily_streams, country, scrape_date
         FROM {table}
         ORDER BY id{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ChartRecord {
                chart_rank: row.get(0)?,
                track_name: row.get(1)?,
                artist: row.get(2)?,
                daily_streams: row.get(3)?,
                country: row.get(4)?,
                scrape_date: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let table = checked_table(table)?;
    let n: usize = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

pub fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let table = checked_table(table)?;
    let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
    Ok(n)
}
