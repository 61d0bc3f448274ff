//! Left outer join of a reference table onto a primary table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::table::{Table, Value};

/// Suffix appended to reference columns whose names clash with the primary table.
pub const REFERENCE_SUFFIX: &str = "_ref";

/// Outcome counts of a join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinReport {
    /// Primary rows with at least one reference match.
    pub matched: usize,
    /// Primary rows with no match; their appended columns are null.
    pub unmatched: usize,
    /// Extra output rows produced by duplicate reference keys.
    pub duplicated: usize,
}

/// Left-join `reference` onto `primary` by `key`.
///
/// Every primary row is kept in order. Reference columns other than the key are
/// appended; unmatched rows get nulls. A reference key that occurs more than
/// once produces one output row per match, in reference order. Null keys never
/// match.
pub fn left_join(primary: &Table, reference: &Table, key: &str) -> Result<Table> {
    left_join_with_report(primary, reference, key).map(|(t, _)| t)
}

/// Like [`left_join`], also returning match counts.
pub fn left_join_with_report(
    primary: &Table,
    reference: &Table,
    key: &str,
) -> Result<(Table, JoinReport)> {
    let primary_key = primary
        .column_index(key)
        .ok_or_else(|| PipelineError::MissingColumn(format!("join key '{}' in primary table", key)))?;
    let reference_key = reference.column_index(key).ok_or_else(|| {
        PipelineError::MissingColumn(format!("join key '{}' in reference table", key))
    })?;

    let appended: Vec<usize> = (0..reference.column_count())
        .filter(|&i| i != reference_key)
        .collect();

    let mut headers = primary.headers.clone();
    for &i in &appended {
        let name = &reference.headers[i];
        if headers.contains(name) {
            headers.push(format!("{}{}", name, REFERENCE_SUFFIX));
        } else {
            headers.push(name.clone());
        }
    }

    let mut index: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (row_idx, row) in reference.rows.iter().enumerate() {
        let cell = Table::cell(row, reference_key);
        if !cell.is_null() {
            index.entry(cell.to_string()).or_default().push(row_idx);
        }
    }

    let mut report = JoinReport::default();
    let mut rows = Vec::with_capacity(primary.row_count());

    for row in &primary.rows {
        let cell = Table::cell(row, primary_key);
        let matches = if cell.is_null() {
            None
        } else {
            index.get(&cell.to_string())
        };

        match matches {
            Some(ref_rows) => {
                report.matched += 1;
                report.duplicated += ref_rows.len() - 1;
                for &r in ref_rows {
                    let mut out = padded(row, primary.column_count());
                    out.extend(
                        appended
                            .iter()
                            .map(|&i| Table::cell(&reference.rows[r], i).clone()),
                    );
                    rows.push(out);
                }
            }
            None => {
                report.unmatched += 1;
                let mut out = padded(row, primary.column_count());
                out.extend(std::iter::repeat_n(Value::Null, appended.len()));
                rows.push(out);
            }
        }
    }

    debug!(
        key,
        matched = report.matched,
        unmatched = report.unmatched,
        duplicated = report.duplicated,
        "joined reference table"
    );
    if report.unmatched > 0 {
        warn!(key, rows = report.unmatched, "rows without a reference match");
    }

    Ok((Table { headers, rows }, report))
}

fn padded(row: &[Value], width: usize) -> Vec<Value> {
    let mut out = row.to_vec();
    out.resize(width, Value::Null);
    out
}
