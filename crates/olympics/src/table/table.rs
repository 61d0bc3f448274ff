//! In-memory tabular data.

use indexmap::IndexMap;

use super::value::Value;

static NULL: Value = Value::Null;

/// Parsed tabular data with typed cells.
///
/// Every row holds exactly one value per header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a new table, padding short rows with nulls and truncating long ones.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Create a table with headers and no rows.
    pub fn empty(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from string literals. Empty strings become nulls.
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| Value::from_cell(cell)).collect())
                .collect(),
        )
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Read a cell from a raw row, treating a short row as null-padded.
    pub fn cell(row: &[Value], index: usize) -> &Value {
        row.get(index).unwrap_or(&NULL)
    }

    /// Get a cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.get(row, col)
    }

    /// View a row as a column-name to value mapping, in header order.
    pub fn row_map(&self, row: usize) -> Option<IndexMap<&str, &Value>> {
        let values = self.rows.get(row)?;
        Some(
            self.headers
                .iter()
                .map(String::as_str)
                .zip(values.iter())
                .collect(),
        )
    }

    /// Return a copy of this table with `f` applied to every cell of one column.
    pub fn map_column(&self, index: usize, mut f: impl FnMut(&Value) -> Value) -> Table {
        let mut out = self.clone();
        for row in &mut out.rows {
            if let Some(cell) = row.get_mut(index) {
                *cell = f(cell);
            }
        }
        out
    }
}
