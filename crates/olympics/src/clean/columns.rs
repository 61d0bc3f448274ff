//! Column-name normalization and the canonical athlete-event schema.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::table::Table;

/// Canonical column order for athlete-event tables.
pub const CANONICAL_COLUMNS: &[&str] = &[
    "id", "name", "sex", "age", "height", "weight", "team", "noc", "games", "year", "season",
    "city", "sport", "event", "medal",
];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a single header: trim, lowercase, internal whitespace runs to `_`.
///
/// `" Athlete  Name "` becomes `athlete_name`; `"NOC"` becomes `noc`.
pub fn normalize_column_name(name: &str) -> String {
    WHITESPACE_RUN
        .replace_all(name.trim(), "_")
        .to_lowercase()
}

/// Return a copy of the table with every header normalized.
pub fn normalize_column_names(table: &Table) -> Table {
    Table {
        headers: table.headers.iter().map(|h| normalize_column_name(h)).collect(),
        rows: table.rows.clone(),
    }
}

/// Return a copy of the table with canonical columns first, in canonical
/// order, followed by every other column in its original order.
///
/// Headers are matched as-is, so this is normally run after
/// [`normalize_column_names`].
pub fn reorder_canonical(table: &Table) -> Table {
    let mut order: Vec<usize> = CANONICAL_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();
    let extras: Vec<usize> = (0..table.column_count())
        .filter(|idx| !order.contains(idx))
        .collect();
    order.extend(extras);

    Table {
        headers: order.iter().map(|&i| table.headers[i].clone()).collect(),
        rows: table
            .rows
            .iter()
            .map(|row| order.iter().map(|&i| Table::cell(row, i).clone()).collect())
            .collect(),
    }
}
