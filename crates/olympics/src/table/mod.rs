//! Tabular data model.

mod source;
#[allow(clippy::module_inception)]
mod table;
mod value;

pub use source::SourceMetadata;
pub use table::Table;
pub use value::Value;
