//! Idempotent bulk insert of transformed records.
//!
//! Records are turned into six-value SQL tuples with every missing value
//! (including NaN ratings) as an explicit NULL, then written with multi-row
//! `INSERT ... ON CONFLICT (rank) DO NOTHING` statements. All pages share one
//! transaction: the batch is committed whole or not at all.

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{params_from_iter, types::Value as SqlValue};

use crate::{record::MovieRecord, schema::MOVIES_TABLE, store::Store};

/// Rows per multi-row VALUES statement.
pub const INSERT_PAGE_SIZE: usize = 100;

/// Builds the tuple bound for one record, in [`MovieRecord::COLUMNS`] order.
pub fn to_sql_row(record: &MovieRecord) -> [SqlValue; 6] {
    [
        SqlValue::Integer(record.rank),
        record.title.clone().map_or(SqlValue::Null, SqlValue::Text),
        record.release_year.map_or(SqlValue::Null, SqlValue::Integer),
        record.runtime_minutes.map_or(SqlValue::Null, SqlValue::Integer),
        record.rated.clone().map_or(SqlValue::Null, SqlValue::Text),
        record
            .rating
            .filter(|rating| rating.is_finite())
            .map_or(SqlValue::Null, SqlValue::Real),
    ]
}

fn insert_statement(rows: usize) -> String {
    let placeholders = vec!["(?, ?, ?, ?, ?, ?)"; rows].join(", ");
    format!(
        "INSERT INTO {MOVIES_TABLE} ({}) VALUES {placeholders} ON CONFLICT (rank) DO NOTHING",
        MovieRecord::COLUMNS.join(", ")
    )
}

/// Inserts `records`, silently skipping ranks that are already stored.
///
/// Returns the number of rows submitted. Rows dropped by the conflict rule
/// are still counted.
pub fn insert_movies(store: &mut Store, records: &[MovieRecord]) -> Result<usize> {
    let tx = store
        .connection_mut()
        .transaction()
        .context("Starting load transaction")?;
    for (page_idx, page) in records.chunks(INSERT_PAGE_SIZE).enumerate() {
        let values = page.iter().flat_map(to_sql_row).collect::<Vec<_>>();
        tx.execute(&insert_statement(page.len()), params_from_iter(values.iter()))
            .with_context(|| format!("Inserting page {} into '{MOVIES_TABLE}'", page_idx + 1))?;
    }
    debug!(
        "Submitted {} page(s) of up to {INSERT_PAGE_SIZE} row(s)",
        records.len().div_ceil(INSERT_PAGE_SIZE)
    );
    tx.commit().context("Committing load transaction")?;
    info!("Inserted {} rows into '{MOVIES_TABLE}' table.", records.len());
    Ok(records.len())
}
