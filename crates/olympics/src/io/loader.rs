//! CSV/TSV loader with delimiter detection.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::table::{SourceMetadata, Table, Value};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Reads tabular files into memory. The first record is always the header.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file into a table.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Table> {
        self.load_with_metadata(path).map(|(table, _)| table)
    }

    /// Load a file and return the table along with source metadata.
    pub fn load_with_metadata(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PipelineError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read(path).map_err(|e| PipelineError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        debug!(
            path = %path.display(),
            rows = metadata.row_count,
            columns = metadata.column_count,
            hash = %metadata.hash,
            "loaded table"
        );

        Ok((table, metadata))
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(PipelineError::EmptyData("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            rows.push(record.iter().map(Value::from_cell).collect());
        }

        Ok(Table::new(headers, rows))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines sampled when sniffing the delimiter.
const SNIFF_LINES: usize = 10;

/// Pick the delimiter whose field count in the header is repeated by the most
/// sample lines. Ties go to the wider split, then to tab. Falls back to comma
/// for single-column files.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<_> = bytes
        .split(|&b| b == b'\n')
        .map(String::from_utf8_lossy)
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    let Some((header, body)) = lines.split_first() else {
        return Err(PipelineError::EmptyData("no lines to sniff a delimiter from".to_string()));
    };

    let best = DELIMITERS
        .iter()
        .filter_map(|&delim| {
            let fields = field_count(header, delim);
            if fields < 2 {
                return None;
            }
            let agreeing = body
                .iter()
                .filter(|line| field_count(line, delim) == fields)
                .count();
            Some(((agreeing, fields, delim == b'\t'), delim))
        })
        .max_by_key(|&(rank, _)| rank)
        .map(|(_, delim)| delim);

    Ok(best.unwrap_or(b','))
}

/// Number of fields `line` splits into, ignoring delimiters inside quotes.
fn field_count(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    1 + line
        .bytes()
        .filter(|&b| {
            if b == b'"' {
                in_quotes = !in_quotes;
            }
            b == delimiter && !in_quotes
        })
        .count()
}
