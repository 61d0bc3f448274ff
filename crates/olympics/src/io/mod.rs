//! Reading and writing tabular files.

mod loader;
mod writer;

pub use loader::{Loader, LoaderConfig};
pub use writer::Writer;
