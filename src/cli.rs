use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// Any combination of `--file`, `--analyze` and `--custom` may be given;
/// they run in that order.
#[derive(Debug, Parser)]
#[command(author, version, about = "Movies data ETL pipeline", long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .multiple(true)
        .args(["file", "analyze", "custom"])
))]
pub struct Cli {
    /// Path to the movies CSV file to load (`-` reads stdin)
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,
    /// Run the analysis queries against the movies table
    #[arg(short = 'a', long = "analyze")]
    pub analyze: bool,
    /// Run a custom SQL query and print its result
    #[arg(short = 'c', long = "custom")]
    pub custom: Option<String>,
    /// SQLite database file (defaults to movies.db)
    #[arg(short = 'd', long = "database", env = "MOVIES_ETL_DATABASE")]
    pub database: Option<PathBuf>,
    /// YAML configuration file with a `database.path` entry
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_one_action_is_required() {
        assert!(Cli::try_parse_from(["movies-etl"]).is_err());
        assert!(Cli::try_parse_from(["movies-etl", "--database", "x.db"]).is_err());
    }

    #[test]
    fn actions_combine() {
        let cli = Cli::try_parse_from([
            "movies-etl",
            "--file",
            "movies.csv",
            "--analyze",
            "--custom",
            "SELECT 1",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("movies.csv")));
        assert!(cli.analyze);
        assert_eq!(cli.custom.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn delimiter_aliases() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
