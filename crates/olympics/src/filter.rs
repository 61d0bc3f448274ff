//! Cohort filtering: restrict a table to one country's rows.
//!
//! The precise match on the NOC code column is preferred. Tables that lack
//! the code column fall back to a case-insensitive substring match on the
//! free-text team name.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::table::Table;

/// Column holding the three-letter NOC code.
pub const CODE_COLUMN: &str = "noc";

/// Column holding the free-text team name.
pub const TEAM_COLUMN: &str = "team";

/// Team names for common NOC codes, used when a cohort has no explicit pattern.
const KNOWN_TEAM_NAMES: &[(&str, &str)] = &[
    ("AUS", "Australia"),
    ("CAN", "Canada"),
    ("CHN", "China"),
    ("FRA", "France"),
    ("GBR", "Great Britain"),
    ("GER", "Germany"),
    ("ITA", "Italy"),
    ("JPN", "Japan"),
    ("KOR", "South Korea"),
    ("NED", "Netherlands"),
    ("RUS", "Russia"),
    ("SWE", "Sweden"),
    ("USA", "United States"),
];

/// A country cohort identified by its NOC code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    /// Three-letter NOC code, e.g. `USA`.
    pub noc: String,
    /// Substring of the team name used when the code column is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_pattern: Option<String>,
}

impl Cohort {
    /// Create a cohort for a NOC code.
    pub fn new(noc: impl Into<String>) -> Self {
        Self {
            noc: noc.into(),
            team_pattern: None,
        }
    }

    /// Set the team-name substring used by the fallback match.
    pub fn with_team_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.team_pattern = Some(pattern.into());
        self
    }

    /// The team-name substring for the fallback match: the explicit pattern,
    /// else a known team name for the code, else the code itself.
    pub fn team_needle(&self) -> String {
        if let Some(pattern) = &self.team_pattern {
            return pattern.clone();
        }
        let code = self.noc.trim().to_uppercase();
        KNOWN_TEAM_NAMES
            .iter()
            .find(|(noc, _)| *noc == code)
            .map(|(_, team)| team.to_string())
            .unwrap_or(code)
    }
}

/// Which matching path a filter run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Exact match on the NOC code column.
    Code,
    /// Substring match on the team name column.
    TeamName,
}

/// Filters tables down to a single cohort.
pub struct CohortFilter {
    cohort: Cohort,
}

impl CohortFilter {
    /// Create a filter for the given cohort.
    pub fn new(cohort: Cohort) -> Self {
        Self { cohort }
    }

    /// Decide which matching path applies to a table.
    pub fn mode(&self, table: &Table) -> Result<FilterMode> {
        if table.has_column(CODE_COLUMN) {
            Ok(FilterMode::Code)
        } else if table.has_column(TEAM_COLUMN) {
            Ok(FilterMode::TeamName)
        } else {
            Err(PipelineError::MissingColumn(format!(
                "cohort filter needs '{}' or '{}'",
                CODE_COLUMN, TEAM_COLUMN
            )))
        }
    }

    /// Keep only matching rows, in their original order.
    pub fn apply(&self, table: &Table) -> Result<Table> {
        self.apply_with_mode(table).map(|(t, _)| t)
    }

    /// Keep only matching rows and report which path was used.
    pub fn apply_with_mode(&self, table: &Table) -> Result<(Table, FilterMode)> {
        let mode = self.mode(table)?;

        let (column, needle) = match mode {
            FilterMode::Code => (CODE_COLUMN, self.cohort.noc.trim().to_uppercase()),
            FilterMode::TeamName => (TEAM_COLUMN, self.cohort.team_needle().to_lowercase()),
        };
        let col_idx = table
            .column_index(column)
            .ok_or_else(|| PipelineError::MissingColumn(column.to_string()))?;

        let rows: Vec<_> = table
            .rows
            .iter()
            .filter(|row| {
                let Some(text) = Table::cell(row, col_idx).as_str() else {
                    return false;
                };
                match mode {
                    FilterMode::Code => text.trim().to_uppercase() == needle,
                    FilterMode::TeamName => text.to_lowercase().contains(&needle),
                }
            })
            .cloned()
            .collect();

        debug!(
            cohort = %self.cohort.noc,
            ?mode,
            rows_in = table.row_count(),
            rows_out = rows.len(),
            "filtered cohort"
        );

        Ok((Table::new(table.headers.clone(), rows), mode))
    }
}
