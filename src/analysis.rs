//! Analytical queries over the `movies` table.
//!
//! [`run_analysis()`] executes a fixed battery of trusted queries and treats
//! any failure as fatal. [`run_custom()`] executes caller-supplied SQL and
//! never fails on a bad query: the error is logged, the transaction rolled
//! back and the run carries on.

use std::io::Write;

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

use crate::store::{QueryResult, Store, query_connection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisQuery {
    pub name: &'static str,
    pub sql: &'static str,
}

pub const ANALYSIS_QUERIES: [AnalysisQuery; 4] = [
    AnalysisQuery {
        name: "Total rows",
        sql: "SELECT COUNT(*) FROM movies",
    },
    AnalysisQuery {
        name: "Top 10 highest-rated movies",
        sql: "SELECT title, rating FROM movies ORDER BY rating DESC LIMIT 10",
    },
    AnalysisQuery {
        name: "Average rating per decade",
        sql: "SELECT (release_year/10)*10 AS decade, AVG(rating) AS avg_rating \
              FROM movies GROUP BY decade ORDER BY decade",
    },
    AnalysisQuery {
        name: "Longest 5 movies",
        sql: "SELECT title, runtime_minutes FROM movies ORDER BY runtime_minutes DESC LIMIT 5",
    },
];

pub fn run_analysis<W: Write>(store: &Store, out: &mut W) -> Result<()> {
    for query in &ANALYSIS_QUERIES {
        info!("--- {} ---", query.name);
        let result = store
            .query(query.sql)
            .with_context(|| format!("Running analysis query '{}'", query.name))?;
        write!(out, "{}", result.render())?;
    }
    Ok(())
}

/// Runs one caller-supplied statement and prints its result.
///
/// Returns `Ok(false)` when the statement failed; only output errors are
/// propagated. The statement never persists changes, since its transaction
/// is always rolled back.
pub fn run_custom<W: Write>(store: &mut Store, sql: &str, out: &mut W) -> Result<bool> {
    match query_in_rollback(store.connection_mut(), sql) {
        Ok(result) => {
            writeln!(out, "\nCustom Query Result:")?;
            write!(out, "{}", result.render())?;
            Ok(true)
        }
        Err(err) => {
            error!("Error running custom SQL: {err:#}");
            Ok(false)
        }
    }
}

fn query_in_rollback(conn: &mut Connection, sql: &str) -> Result<QueryResult> {
    let tx = conn
        .transaction()
        .context("Starting custom query transaction")?;
    let result = query_connection(&tx, sql);
    tx.rollback()
        .context("Rolling back custom query transaction")?;
    result
}
