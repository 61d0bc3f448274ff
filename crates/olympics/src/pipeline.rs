//! Stage orchestration: extract, transform and model.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::Aggregator;
use crate::clean::{normalize_column_names, Cleaner};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::filter::CohortFilter;
use crate::io::{Loader, Writer};
use crate::join::left_join;
use crate::table::Table;

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    Transform,
    Model,
}

impl Stage {
    /// Past-tense verb for status lines.
    pub fn verb(&self) -> &'static str {
        match self {
            Stage::Extract => "Extracted",
            Stage::Transform => "Transformed",
            Stage::Model => "Modeled",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Transform => write!(f, "transform"),
            Stage::Model => write!(f, "model"),
        }
    }
}

/// What a stage produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    /// Files written, primary output first.
    pub outputs: Vec<PathBuf>,
    /// Rows in the stage's primary input.
    pub rows_in: usize,
    /// Rows in the stage's primary output.
    pub rows_out: usize,
    pub completed_at: DateTime<Utc>,
}

impl StageReport {
    fn new(stage: Stage, outputs: Vec<PathBuf>, rows_in: usize, rows_out: usize) -> Self {
        Self {
            stage,
            outputs,
            rows_in,
            rows_out,
            completed_at: Utc::now(),
        }
    }

    /// The primary output path.
    pub fn output(&self) -> Option<&PathBuf> {
        self.outputs.first()
    }
}

/// Runs the three pipeline stages against the configured directory layout.
///
/// Each stage reads its inputs from disk and writes its outputs back, so stages
/// can run independently. Any error aborts the stage.
pub struct Pipeline {
    config: PipelineConfig,
    loader: Loader,
    writer: Writer,
    cleaner: Cleaner,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        let cleaner = Cleaner::with_config(config.transform.clean.clone());
        // Non-ASCII delimiters are rejected when the config is loaded
        let writer = Writer::new().with_delimiter(config.paths.delimiter as u8);
        Self {
            config,
            loader: Loader::new(),
            writer,
            cleaner,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Copy the source files from the input directory into the raw directory.
    pub fn extract(&self) -> Result<StageReport> {
        let paths = &self.config.paths;
        info!(input = %paths.input_dir.display(), "extract started");

        let athletes = self.loader.load(paths.input_athletes())?;
        let regions = self.loader.load(paths.input_regions())?;

        let raw_athletes = paths.raw_athletes();
        let raw_regions = paths.raw_regions();
        let rows = self.writer.write(&athletes, &raw_athletes)?;
        self.writer.write(&regions, &raw_regions)?;

        info!(rows, "extract finished");
        Ok(StageReport::new(
            Stage::Extract,
            vec![raw_athletes, raw_regions],
            athletes.row_count(),
            rows,
        ))
    }

    /// Clean the raw athletes, optionally filter and join regions, and write
    /// the cleaned table.
    pub fn transform(&self) -> Result<StageReport> {
        let paths = &self.config.paths;
        let settings = &self.config.transform;
        info!(raw = %paths.raw_dir.display(), "transform started");

        let athletes = self.loader.load(paths.raw_athletes())?;
        let rows_in = athletes.row_count();
        let mut table = self.cleaner.clean(&athletes);

        if let Some(cohort) = &settings.cohort {
            table = CohortFilter::new(cohort.clone()).apply(&table)?;
        }

        if settings.join_regions {
            if table.has_column(&settings.join_key) {
                let regions = self.prepare_reference(&self.loader.load(paths.raw_regions())?);
                table = left_join(&table, &regions, &settings.join_key)?;
            } else {
                warn!(key = %settings.join_key, "athletes have no join key column, skipping region join");
            }
        }

        let output = paths.cleaned();
        let rows = self.writer.write(&table, &output)?;

        info!(rows_in, rows_out = rows, "transform finished");
        Ok(StageReport::new(Stage::Transform, vec![output], rows_in, rows))
    }

    /// Summarize the cleaned table for the model cohort and write the result.
    pub fn model(&self) -> Result<StageReport> {
        let paths = &self.config.paths;
        let settings = &self.config.model;
        info!(cleaned = %paths.cleaned().display(), "model started");

        let cleaned = self.loader.load(paths.cleaned())?;
        let rows_in = cleaned.row_count();

        // Reloaded cells are text again; cleaning restores the numeric types
        let mut table = self.cleaner.clean(&cleaned);

        if let Some(cohort) = &settings.cohort {
            table = CohortFilter::new(cohort.clone()).apply(&table)?;
        }

        let summary = Aggregator::with_spec(settings.aggregate.clone()).aggregate(&table)?;

        let output = paths.model();
        let rows = self.writer.write(&summary, &output)?;

        info!(rows_in, groups = rows, "model finished");
        Ok(StageReport::new(Stage::Model, vec![output], rows_in, rows))
    }

    /// Run extract, transform and model in order, stopping at the first error.
    pub fn run_all(&self) -> Result<Vec<StageReport>> {
        Ok(vec![self.extract()?, self.transform()?, self.model()?])
    }

    /// Run a single stage.
    pub fn run(&self, stage: Stage) -> Result<StageReport> {
        match stage {
            Stage::Extract => self.extract(),
            Stage::Transform => self.transform(),
            Stage::Model => self.model(),
        }
    }

    /// Normalize reference headers, missing markers and string casing so its
    /// key lines up with the cleaned athletes.
    fn prepare_reference(&self, reference: &Table) -> Table {
        let table = normalize_column_names(reference);
        let table = self.cleaner.normalize_missing(&table);
        self.cleaner.standardize_strings(&table)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
