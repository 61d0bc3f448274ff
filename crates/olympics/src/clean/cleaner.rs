//! Cleaning steps for athlete-event tables.
//!
//! Every step takes a table by reference and returns a new one; the input is
//! never modified. Cleaning never drops rows.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::table::{Table, Value};

use super::columns::{normalize_column_names, reorder_canonical};
use super::medal::Medal;

/// Case convention applied to a string column after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseRule {
    /// Trim only.
    Trim,
    /// Uppercase (e.g. sex codes, NOC codes).
    Upper,
    /// Lowercase.
    Lower,
    /// Title case (e.g. season, city).
    Title,
}

impl CaseRule {
    /// Apply the rule to already-trimmed text.
    pub fn apply(&self, text: &str) -> String {
        match self {
            CaseRule::Trim => text.to_string(),
            CaseRule::Upper => text.to_uppercase(),
            CaseRule::Lower => text.to_lowercase(),
            CaseRule::Title => title_case(text),
        }
    }
}

/// Target type for numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    /// Whole numbers; fractional values are kept as floats.
    Integer,
    /// Floating-point numbers.
    Float,
}

/// Configuration for the cleaner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Literal cell contents treated as missing (compared after trimming).
    pub missing_markers: Vec<String>,
    /// Columns to coerce to numbers.
    pub numeric_columns: IndexMap<String, NumericKind>,
    /// Case conventions for string columns.
    pub case_rules: IndexMap<String, CaseRule>,
    /// Column holding the medal outcome.
    pub medal_column: String,
}

impl Default for CleanConfig {
    fn default() -> Self {
        let numeric_columns = [
            ("age", NumericKind::Integer),
            ("height", NumericKind::Float),
            ("weight", NumericKind::Float),
            ("year", NumericKind::Integer),
        ];
        let case_rules = [
            ("name", CaseRule::Trim),
            ("sex", CaseRule::Upper),
            ("team", CaseRule::Trim),
            ("noc", CaseRule::Upper),
            ("games", CaseRule::Trim),
            ("season", CaseRule::Title),
            ("city", CaseRule::Title),
            ("sport", CaseRule::Trim),
            ("event", CaseRule::Trim),
        ];

        Self {
            missing_markers: vec!["NA".to_string(), "N/A".to_string(), String::new()],
            numeric_columns: numeric_columns
                .into_iter()
                .map(|(c, k)| (c.to_string(), k))
                .collect(),
            case_rules: case_rules
                .into_iter()
                .map(|(c, r)| (c.to_string(), r))
                .collect(),
            medal_column: "medal".to_string(),
        }
    }
}

/// Counts of cells changed by a cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    /// Cells replaced with null because they held a missing marker.
    pub missing_normalized: usize,
    /// Non-empty cells that failed numeric coercion and became null.
    pub coercion_failures: usize,
    /// Non-empty medal values outside the closed set, forced to `None`.
    pub medals_coerced: usize,
}

/// Applies the cleaning steps to athlete-event tables.
pub struct Cleaner {
    config: CleanConfig,
}

impl Cleaner {
    /// Create a cleaner with the default athlete-event configuration.
    pub fn new() -> Self {
        Self::with_config(CleanConfig::default())
    }

    /// Create a cleaner with custom configuration.
    pub fn with_config(config: CleanConfig) -> Self {
        Self { config }
    }

    /// Run every step in order and return the cleaned table.
    pub fn clean(&self, table: &Table) -> Table {
        self.clean_with_report(table).0
    }

    /// Run every step in order, also returning what changed.
    pub fn clean_with_report(&self, table: &Table) -> (Table, CleanReport) {
        let mut report = CleanReport::default();

        let table = reorder_canonical(&normalize_column_names(table));
        let (table, missing) = self.missing_counted(&table);
        report.missing_normalized = missing;
        let table = self.standardize_strings(&table);
        let (table, failures) = self.coerce_counted(&table);
        report.coercion_failures = failures;
        let (table, coerced) = self.medals_counted(&table);
        report.medals_coerced = coerced;

        debug!(
            rows = table.row_count(),
            missing = report.missing_normalized,
            coercion_failures = report.coercion_failures,
            medals_coerced = report.medals_coerced,
            "cleaned table"
        );
        if report.coercion_failures > 0 {
            warn!(
                cells = report.coercion_failures,
                "non-numeric values in numeric columns replaced with null"
            );
        }

        (table, report)
    }

    /// Replace missing markers with null in every column.
    pub fn normalize_missing(&self, table: &Table) -> Table {
        self.missing_counted(table).0
    }

    /// Trim every string cell, then apply the configured case rules.
    pub fn standardize_strings(&self, table: &Table) -> Table {
        let rules: Vec<Option<CaseRule>> = table
            .headers
            .iter()
            .map(|h| self.config.case_rules.get(h).copied())
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&rules)
                    .map(|(cell, rule)| match cell {
                        Value::Str(s) => {
                            let trimmed = s.trim();
                            match rule {
                                Some(rule) => Value::Str(rule.apply(trimmed)),
                                None => Value::Str(trimmed.to_string()),
                            }
                        }
                        other => other.clone(),
                    })
                    .collect()
            })
            .collect();

        Table {
            headers: table.headers.clone(),
            rows,
        }
    }

    /// Coerce the configured numeric columns. Unparseable cells become null.
    pub fn coerce_numeric(&self, table: &Table) -> Table {
        self.coerce_counted(table).0
    }

    /// Force the medal column into {Gold, Silver, Bronze, None}.
    ///
    /// Tables without a medal column are returned unchanged.
    pub fn normalize_medals(&self, table: &Table) -> Table {
        self.medals_counted(table).0
    }

    fn missing_counted(&self, table: &Table) -> (Table, usize) {
        let mut count = 0;
        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Value::Str(s) if self.is_missing_marker(s) => {
                            count += 1;
                            Value::Null
                        }
                        other => other.clone(),
                    })
                    .collect()
            })
            .collect();

        (
            Table {
                headers: table.headers.clone(),
                rows,
            },
            count,
        )
    }

    fn is_missing_marker(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.config.missing_markers.iter().any(|m| m == trimmed)
    }

    fn coerce_counted(&self, table: &Table) -> (Table, usize) {
        let mut out = table.clone();
        let mut failures = 0;

        for (column, kind) in &self.config.numeric_columns {
            let Some(col_idx) = table.column_index(column) else {
                continue;
            };
            out = out.map_column(col_idx, |cell| {
                let coerced = coerce_value(cell, *kind);
                if coerced.is_null() && !cell.is_null() {
                    failures += 1;
                }
                coerced
            });
        }

        (out, failures)
    }

    fn medals_counted(&self, table: &Table) -> (Table, usize) {
        let Some(col_idx) = table.column_index(&self.config.medal_column) else {
            return (table.clone(), 0);
        };

        let mut coerced = 0;
        let out = table.map_column(col_idx, |cell| {
            let medal = Medal::from_value(cell);
            if medal == Medal::None {
                if let Value::Str(s) = cell {
                    if !s.trim().eq_ignore_ascii_case("none") {
                        coerced += 1;
                    }
                }
            }
            medal.into()
        });

        (out, coerced)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Coerce one cell to the requested numeric kind, or null.
pub fn coerce_value(value: &Value, kind: NumericKind) -> Value {
    match kind {
        NumericKind::Integer => match value.as_i64() {
            Some(i) => Value::Int(i),
            None => value.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        NumericKind::Float => value.as_f64().map(Value::Float).unwrap_or(Value::Null),
    }
}

/// Title-case text: the first letter of every alphabetic run is uppercased,
/// the rest lowercased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> Table {
        Table::from_strings(
            &["ID", "Name", "Sex", "Age", "Team", "NOC", "Year", "Season", "City", "Medal"],
            &[
                &["1", "  A Dijiang ", "m", "24", "China", "chn", "1992", "summer", "barcelona", "NA"],
                &["2", "Alice", "F", "twenty", "United States", "USA", "2000", "Summer", "sydney", "gold"],
                &["3", "Bob", "M", "N/A", "United States", "USA", "2000.0", "WINTER", "salt lake city", "Tin"],
            ],
        )
    }

    #[test]
    fn test_clean_preserves_row_count() {
        let table = raw_table();
        let cleaned = Cleaner::new().clean(&table);
        assert_eq!(cleaned.row_count(), table.row_count());
    }

    #[test]
    fn test_clean_does_not_modify_input() {
        let table = raw_table();
        let before = table.clone();
        let _ = Cleaner::new().clean(&table);
        assert_eq!(table, before);
    }

    #[test]
    fn test_clean_full() {
        let (cleaned, report) = Cleaner::new().clean_with_report(&raw_table());

        assert_eq!(
            cleaned.headers,
            vec!["id", "name", "sex", "age", "team", "noc", "year", "season", "city", "medal"]
        );
        assert_eq!(cleaned.value(0, "name"), Some(&Value::from("A Dijiang")));
        assert_eq!(cleaned.value(0, "sex"), Some(&Value::from("M")));
        assert_eq!(cleaned.value(0, "noc"), Some(&Value::from("CHN")));
        assert_eq!(cleaned.value(0, "age"), Some(&Value::Int(24)));
        assert_eq!(cleaned.value(0, "season"), Some(&Value::from("Summer")));
        assert_eq!(cleaned.value(2, "season"), Some(&Value::from("Winter")));
        assert_eq!(cleaned.value(2, "city"), Some(&Value::from("Salt Lake City")));
        assert_eq!(cleaned.value(2, "year"), Some(&Value::Int(2000)));
        assert_eq!(cleaned.value(1, "age"), Some(&Value::Null));
        assert_eq!(cleaned.value(2, "age"), Some(&Value::Null));

        assert_eq!(cleaned.value(0, "medal"), Some(&Value::from("None")));
        assert_eq!(cleaned.value(1, "medal"), Some(&Value::from("Gold")));
        assert_eq!(cleaned.value(2, "medal"), Some(&Value::from("None")));

        assert_eq!(report.missing_normalized, 2);
        assert_eq!(report.coercion_failures, 1);
        assert_eq!(report.medals_coerced, 1);
    }

    #[test]
    fn test_empty_medal_and_bad_age() {
        let table = Table::from_strings(&["noc", "medal", "age"], &[&["USA", "", "twenty"]]);
        let cleaned = Cleaner::new().clean(&table);

        assert_eq!(cleaned.value(0, "medal"), Some(&Value::from("None")));
        assert_eq!(cleaned.value(0, "age"), Some(&Value::Null));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let cleaner = Cleaner::new();
        let once = cleaner.clean(&raw_table());
        let (twice, report) = cleaner.clean_with_report(&once);
        assert_eq!(once, twice);
        assert_eq!(report, CleanReport::default());
    }

    #[test]
    fn test_numeric_kinds() {
        let table = Table::from_strings(
            &["age", "height", "weight"],
            &[&["24.5", "180", "80.5"], &["", "tall", "1e2"]],
        );
        let coerced = Cleaner::new().coerce_numeric(&table);

        assert_eq!(coerced.rows[0], vec![Value::Float(24.5), Value::Float(180.0), Value::Float(80.5)]);
        assert_eq!(coerced.rows[1], vec![Value::Null, Value::Null, Value::Float(100.0)]);
    }

    #[test]
    fn test_missing_markers_are_exact() {
        let table = Table::from_strings(&["team"], &[&["NA"], &[" N/A "], &["na"], &["Nauru"]]);
        let cleaned = Cleaner::new().normalize_missing(&table);

        assert_eq!(cleaned.get(0, 0), Some(&Value::Null));
        assert_eq!(cleaned.get(1, 0), Some(&Value::Null));
        assert_eq!(cleaned.get(2, 0), Some(&Value::from("na")));
        assert_eq!(cleaned.get(3, 0), Some(&Value::from("Nauru")));
    }

    #[test]
    fn test_steps_skip_missing_columns() {
        let table = Table::from_strings(&["region"], &[&["USA"]]);
        let cleaner = Cleaner::new();
        assert_eq!(cleaner.normalize_medals(&table), table);
        assert_eq!(cleaner.coerce_numeric(&table), table);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("rio de janeiro"), "Rio De Janeiro");
        assert_eq!(title_case("GARMISCH-PARTENKIRCHEN"), "Garmisch-Partenkirchen");
        assert_eq!(title_case("st. moritz"), "St. Moritz");
        assert_eq!(title_case(""), "");
    }
}
