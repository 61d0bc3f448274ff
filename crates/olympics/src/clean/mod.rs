//! Cleaning and normalization of raw athlete-event tables.

mod cleaner;
mod columns;
mod medal;

pub use cleaner::{
    coerce_value, title_case, CaseRule, CleanConfig, CleanReport, Cleaner, NumericKind,
};
pub use columns::{
    normalize_column_name, normalize_column_names, reorder_canonical, CANONICAL_COLUMNS,
};
pub use medal::Medal;
