//! CSV writer for tables.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::table::Table;

/// Serializes tables to delimited files.
pub struct Writer {
    delimiter: u8,
}

impl Writer {
    /// Create a comma-delimited writer.
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Use a different delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write `table` to `path`, creating parent directories and overwriting any
    /// existing file. Returns the number of data rows written.
    pub fn write(&self, table: &Table, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| PipelineError::io(path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(BufWriter::new(file));

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush().map_err(|e| PipelineError::io(path, e))?;

        debug!(path = %path.display(), rows = table.row_count(), "wrote table");

        Ok(table.row_count())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}
