//! Input plumbing for the movies source file.
//!
//! [`CsvSource`] wraps a `csv` reader over a path (or `-` for stdin), picks
//! the delimiter from the file extension unless one is given, and hands out
//! decoded rows numbered by their line in the file. Rows shorter than the
//! header are passed through so missing trailing cells read as absent; rows
//! longer than the header are rejected.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use log::debug;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// How the source file should be read.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Explicit delimiter; `None` picks one from the file extension.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

impl ReadOptions {
    pub fn new(delimiter: Option<u8>, encoding_label: Option<&str>) -> Result<Self> {
        Ok(Self {
            delimiter,
            encoding: resolve_encoding(encoding_label)?,
        })
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'")),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}

/// A header-first CSV input with decoded, line-numbered rows.
pub struct CsvSource {
    reader: csv::Reader<Box<dyn Read>>,
    encoding: &'static Encoding,
    path: PathBuf,
    width: usize,
    record: csv::ByteRecord,
}

impl CsvSource {
    pub fn open(path: &Path, options: &ReadOptions) -> Result<Self> {
        let delimiter = resolve_input_delimiter(path, options.delimiter);
        debug!(
            "Reading {:?} with delimiter '{}' and encoding {}",
            path,
            printable_delimiter(delimiter),
            options.encoding.name()
        );
        let input: Box<dyn Read> = if path == Path::new("-") {
            Box::new(std::io::stdin().lock())
        } else {
            Box::new(BufReader::new(
                File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
            ))
        };
        Ok(Self::from_reader(input, path, delimiter, options.encoding))
    }

    pub fn from_reader(
        input: Box<dyn Read>,
        path: &Path,
        delimiter: u8,
        encoding: &'static Encoding,
    ) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .double_quote(true)
            .flexible(true)
            .from_reader(input);
        Self {
            reader,
            encoding,
            path: path.to_path_buf(),
            width: 0,
            record: csv::ByteRecord::new(),
        }
    }

    /// Decoded header names. Later rows may not be wider than this.
    pub fn headers(&mut self) -> Result<Vec<String>> {
        let raw = self
            .reader
            .byte_headers()
            .with_context(|| format!("Reading headers from {:?}", self.path))?;
        let headers = decode_fields(raw, self.encoding)
            .with_context(|| format!("Decoding headers from {:?}", self.path))?;
        self.width = headers.len();
        Ok(headers)
    }

    /// The next data row and its 1-based line number, or `None` at the end.
    pub fn next_row(&mut self) -> Result<Option<(usize, Vec<String>)>> {
        if self.width == 0 {
            self.headers()?;
        }
        let line = self.reader.position().line() as usize;
        let has_row = self
            .reader
            .read_byte_record(&mut self.record)
            .with_context(|| format!("Reading row {line} in {:?}", self.path))?;
        if !has_row {
            return Ok(None);
        }
        let line = self
            .record
            .position()
            .map_or(line, |position| position.line() as usize);
        if self.record.len() > self.width {
            bail!(
                "Row {line} in {:?} has {} fields but the header has {}",
                self.path,
                self.record.len(),
                self.width
            );
        }
        let decoded = decode_fields(&self.record, self.encoding)
            .with_context(|| format!("Decoding row {line} in {:?}", self.path))?;
        Ok(Some((line, decoded)))
    }
}

fn decode_fields(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| {
            let (text, _, had_errors) = encoding.decode(field);
            if had_errors {
                Err(anyhow!("Failed to decode text with encoding {}", encoding.name()))
            } else {
                Ok(text.into_owned())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(contents: &'static [u8]) -> CsvSource {
        CsvSource::from_reader(Box::new(contents), Path::new("inline.csv"), b',', UTF_8)
    }

    #[test]
    fn delimiter_follows_extension_unless_overridden() {
        assert_eq!(resolve_input_delimiter(Path::new("movies.csv"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("movies.TSV"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("movies.tsv"), Some(b';')), b';');
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
        assert_eq!(resolve_encoding(Some(" windows-1252 ")).unwrap().name(), "windows-1252");
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
    }

    #[test]
    fn decodes_latin1_bytes() {
        let encoding = resolve_encoding(Some("windows-1252")).unwrap();
        let record = csv::ByteRecord::from(vec![&b"Am\xe9lie"[..], &b"PG"[..]]);
        assert_eq!(
            decode_fields(&record, encoding).unwrap(),
            vec!["Amélie".to_string(), "PG".to_string()]
        );
    }

    #[test]
    fn rows_carry_their_line_numbers() {
        let mut csv = source(b"a,b\n1,2\n\"multi\nline\",3\n4,5\n");
        assert_eq!(csv.headers().unwrap(), vec!["a", "b"]);
        assert_eq!(csv.next_row().unwrap().unwrap().0, 2);
        assert_eq!(csv.next_row().unwrap().unwrap().0, 3);
        assert_eq!(csv.next_row().unwrap().unwrap().0, 5);
        assert!(csv.next_row().unwrap().is_none());
    }

    #[test]
    fn short_rows_pass_and_long_rows_fail() {
        let mut csv = source(b"a,b,c\n1\n1,2,3,4\n");
        csv.headers().unwrap();
        assert_eq!(csv.next_row().unwrap(), Some((2, vec!["1".to_string()])));
        let err = csv.next_row().unwrap_err();
        assert!(err.to_string().contains("has 4 fields but the header has 3"));
    }
}
