//! Olympics: a batch ETL pipeline for the Olympic athlete-events dataset.
//!
//! Three stages run over flat files:
//!
//! - **Extract**: copy the source CSVs into the raw directory
//! - **Transform**: clean, optionally filter, and join NOC regions
//! - **Model**: summarize medals per (year, sport) for one cohort
//!
//! Each building block is a pure function from table to table and can be used
//! on its own.
//!
//! # Example
//!
//! ```no_run
//! use olympics::{Aggregator, Cleaner, Cohort, CohortFilter, Loader};
//!
//! let raw = Loader::new().load("raw/athlete_events.csv").unwrap();
//! let cleaned = Cleaner::new().clean(&raw);
//! let usa = CohortFilter::new(Cohort::new("USA")).apply(&cleaned).unwrap();
//! let summary = Aggregator::new().aggregate(&usa).unwrap();
//!
//! println!("Groups: {}", summary.row_count());
//! ```

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod join;
pub mod pipeline;
pub mod table;

pub use aggregate::{AggregateSpec, Aggregator, GroupSummary};
pub use clean::{CleanConfig, CleanReport, Cleaner, Medal};
pub use config::{ModelConfig, PathsConfig, PipelineConfig, TransformConfig};
pub use error::{PipelineError, Result};
pub use filter::{Cohort, CohortFilter, FilterMode};
pub use io::{Loader, LoaderConfig, Writer};
pub use join::{left_join, JoinReport};
pub use pipeline::{Pipeline, Stage, StageReport};
pub use table::{SourceMetadata, Table, Value};
