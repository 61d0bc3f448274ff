//! The closed set of medal outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::Value;

/// Medal outcome for an athlete-event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
    /// No medal. Also the landing spot for anything unrecognized.
    None,
}

impl Medal {
    /// Parse free text, case-insensitively. Anything outside the set is `None`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("gold") {
            Medal::Gold
        } else if trimmed.eq_ignore_ascii_case("silver") {
            Medal::Silver
        } else if trimmed.eq_ignore_ascii_case("bronze") {
            Medal::Bronze
        } else {
            Medal::None
        }
    }

    /// Normalize a cell. Missing values become `None`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Str(s) => Medal::parse(s),
            _ => Medal::None,
        }
    }

    /// Exact-label match, used by aggregation on already-cleaned data.
    pub fn from_label(value: &Value) -> Self {
        match value.as_str() {
            Some("Gold") => Medal::Gold,
            Some("Silver") => Medal::Silver,
            Some("Bronze") => Medal::Bronze,
            _ => Medal::None,
        }
    }

    /// Canonical label written to output files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Gold => "Gold",
            Medal::Silver => "Silver",
            Medal::Bronze => "Bronze",
            Medal::None => "None",
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Medal> for Value {
    fn from(medal: Medal) -> Self {
        Value::from(medal.as_str())
    }
}
