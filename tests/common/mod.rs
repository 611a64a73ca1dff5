#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use movies_etl::{
    config::DatabaseConfig, loader, record::MovieRecord, schema, store::Store,
};
use tempfile::{TempDir, tempdir};

pub const MOVIES_HEADER: &str = "Rank,Title,Release,Runtime,Rated,Ratings";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }

    /// Writes a movies CSV with the standard header followed by `rows`.
    pub fn write_movies(&self, name: &str, rows: &[&str]) -> PathBuf {
        let mut contents = String::from(MOVIES_HEADER);
        contents.push('\n');
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        self.write(name, contents.as_bytes())
    }

    pub fn database_path(&self) -> PathBuf {
        self.temp_dir.path().join("movies.db")
    }

    pub fn open_store(&self) -> Store {
        Store::open(&DatabaseConfig::new(self.database_path())).expect("open store")
    }
}

pub fn movie(rank: i64, title: &str, year: Option<i64>, runtime: i64, rating: Option<f64>) -> MovieRecord {
    MovieRecord {
        rank,
        title: Some(title.to_string()),
        release_year: year,
        runtime_minutes: Some(runtime),
        rated: Some("PG".to_string()),
        rating,
    }
}

/// Creates the table and loads `records` into an in-memory store.
pub fn seeded_store(records: &[MovieRecord]) -> Store {
    let mut store = Store::open(&DatabaseConfig::in_memory()).expect("open in-memory store");
    schema::ensure_movies_table(&store).expect("create movies table");
    loader::insert_movies(&mut store, records).expect("seed movies");
    store
}
