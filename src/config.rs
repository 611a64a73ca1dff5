//! Database settings.
//!
//! The database path comes from, in order: the `--database` flag (or the
//! `MOVIES_ETL_DATABASE` environment variable, which clap folds into the
//! same flag), the `database.path` key of a YAML file passed with
//! `--config`, and finally [`DEFAULT_DATABASE_PATH`].

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_DATABASE_PATH: &str = "movies.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// SQLite database file; `:memory:` opens a private in-memory database.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    /// Applies the precedence rules described in the module docs.
    pub fn resolve(flag: Option<&Path>, config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = flag {
            return Ok(Self::new(path));
        }
        match config_file {
            Some(path) => Ok(ConfigFile::load(path)?.database),
            None => Ok(Self::default()),
        }
    }
}

/// Layout of the optional `--config` YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening config file {path:?}"))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).with_context(|| format!("Parsing config file {path:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn flag_wins_over_config_file() {
        let file = write_config("database:\n  path: from-file.db\n");
        let resolved =
            DatabaseConfig::resolve(Some(Path::new("flag.db")), Some(file.path())).unwrap();
        assert_eq!(resolved, DatabaseConfig::new("flag.db"));
    }

    #[test]
    fn config_file_is_used_without_flag() {
        let file = write_config("database:\n  path: /var/lib/movies/catalog.db\n");
        let resolved = DatabaseConfig::resolve(None, Some(file.path())).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/var/lib/movies/catalog.db"));
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        assert_eq!(
            DatabaseConfig::resolve(None, None).unwrap().path,
            PathBuf::from(DEFAULT_DATABASE_PATH)
        );
        let empty = write_config("{}\n");
        assert_eq!(
            DatabaseConfig::resolve(None, Some(empty.path())).unwrap(),
            DatabaseConfig::default()
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("database:\n  path: a.db\n  password: hunter2\n");
        assert!(DatabaseConfig::resolve(None, Some(file.path())).is_err());
    }
}
