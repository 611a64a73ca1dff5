//! The SQLite connection held for the duration of a run.
//!
//! A [`Store`] owns exactly one [`Connection`]. Dropping it closes the
//! connection, so every exit path (including `?` propagation) releases it;
//! [`Store::close()`] is the explicit end-of-run variant that also reports
//! close failures.

use anyhow::{Context, Result, bail};
use log::debug;
use rusqlite::{Connection, OptionalExtension, types::Value as SqlValue};

use crate::{config::DatabaseConfig, record::MovieRecord, table};

#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

/// Header names and typed cells returned by one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl QueryResult {
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(display_value).collect())
            .collect()
    }

    pub fn render(&self) -> String {
        table::render_table(&self.columns, &self.display_rows())
    }
}

impl Store {
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let conn = Connection::open(&config.path)
            .with_context(|| format!("Opening database {:?}", config.path))?;
        debug!("Opened database {:?}", config.path);
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        query_connection(&self.conn, sql)
    }

    pub fn count_movies(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .context("Counting rows in 'movies'")
    }

    pub fn fetch_movie(&self, rank: i64) -> Result<Option<MovieRecord>> {
        self.conn
            .query_row(
                "SELECT rank, title, release_year, runtime_minutes, rated, rating \
                 FROM movies WHERE rank = ?1",
                [rank],
                |row| {
                    Ok(MovieRecord {
                        rank: row.get(0)?,
                        title: row.get(1)?,
                        release_year: row.get(2)?,
                        runtime_minutes: row.get(3)?,
                        rated: row.get(4)?,
                        rating: row.get(5)?,
                    })
                },
            )
            .optional()
            .with_context(|| format!("Fetching movie with rank {rank}"))
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("Closing database connection")
    }
}

/// Executes one row-returning statement on `conn` and collects every row.
pub fn query_connection(conn: &Connection, sql: &str) -> Result<QueryResult> {
    let mut statement = conn.prepare(sql).context("Preparing query")?;
    if statement.column_count() == 0 {
        bail!("Statement does not return a result set");
    }
    let columns = statement
        .column_names()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    let mut rows = statement.query([]).context("Executing query")?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next().context("Fetching query row")? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            values.push(row.get::<usize, SqlValue>(idx)?);
        }
        collected.push(values);
    }
    Ok(QueryResult {
        columns,
        rows: collected,
    })
}

pub fn display_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => String::new(),
        SqlValue::Integer(n) => n.to_string(),
        SqlValue::Real(x) => x.to_string(),
        SqlValue::Text(text) => text.clone(),
        SqlValue::Blob(bytes) => format!("<blob {} bytes>", bytes.len()),
    }
}
