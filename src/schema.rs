use anyhow::{Context, Result};
use log::info;

use crate::store::Store;

pub const MOVIES_TABLE: &str = "movies";

const CREATE_MOVIES_TABLE: &str = "CREATE TABLE IF NOT EXISTS movies (
    rank INTEGER PRIMARY KEY,
    title TEXT,
    release_year INTEGER,
    runtime_minutes INTEGER,
    rated TEXT,
    rating FLOAT
)";

/// Creates the `movies` table when it is absent. Existing tables are left
/// exactly as they are.
pub fn ensure_movies_table(store: &Store) -> Result<()> {
    store
        .connection()
        .execute_batch(CREATE_MOVIES_TABLE)
        .with_context(|| format!("Creating table '{MOVIES_TABLE}'"))?;
    info!("Table '{MOVIES_TABLE}' created or already exists.");
    Ok(())
}
