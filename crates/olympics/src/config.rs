//! Pipeline configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) yields
//! the conventional `input/`, `raw/`, `processed/` layout.
//!
//! ```toml
//! [paths]
//! processed_dir = "data/processed"
//!
//! [model.cohort]
//! noc = "GBR"
//! team_pattern = "Great Britain"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateSpec;
use crate::clean::CleanConfig;
use crate::error::{PipelineError, Result};
use crate::filter::Cohort;

/// File locations for every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where the downloaded source files live.
    pub input_dir: PathBuf,
    /// Where extraction copies the source files.
    pub raw_dir: PathBuf,
    /// Where cleaned and modeled output goes.
    pub processed_dir: PathBuf,
    pub athletes_file: String,
    pub regions_file: String,
    pub cleaned_file: String,
    pub model_file: String,
    /// Field delimiter for files the pipeline writes. Must be ASCII.
    pub delimiter: char,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            raw_dir: PathBuf::from("raw"),
            processed_dir: PathBuf::from("processed"),
            athletes_file: "athlete_events.csv".to_string(),
            regions_file: "noc_regions.csv".to_string(),
            cleaned_file: "olympics_cleaned.csv".to_string(),
            model_file: "team_usa_model.csv".to_string(),
            delimiter: ',',
        }
    }
}

impl PathsConfig {
    pub fn input_athletes(&self) -> PathBuf {
        self.input_dir.join(&self.athletes_file)
    }

    pub fn input_regions(&self) -> PathBuf {
        self.input_dir.join(&self.regions_file)
    }

    pub fn raw_athletes(&self) -> PathBuf {
        self.raw_dir.join(&self.athletes_file)
    }

    pub fn raw_regions(&self) -> PathBuf {
        self.raw_dir.join(&self.regions_file)
    }

    pub fn cleaned(&self) -> PathBuf {
        self.processed_dir.join(&self.cleaned_file)
    }

    pub fn model(&self) -> PathBuf {
        self.processed_dir.join(&self.model_file)
    }
}

/// Settings for the transform stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Restrict the cleaned output to one cohort (None = whole dataset).
    pub cohort: Option<Cohort>,
    /// Left-join the NOC region table onto the athletes.
    pub join_regions: bool,
    /// Column shared by the athlete and region tables.
    pub join_key: String,
    /// Cleaning rules.
    pub clean: CleanConfig,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            cohort: None,
            join_regions: true,
            join_key: "noc".to_string(),
            clean: CleanConfig::default(),
        }
    }
}

/// Settings for the model stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Cohort to summarize (None = whole dataset).
    pub cohort: Option<Cohort>,
    /// Grouping and metric columns.
    #[serde(flatten)]
    pub aggregate: AggregateSpec,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cohort: Some(Cohort::new("USA").with_team_pattern("United States")),
            aggregate: AggregateSpec::default(),
        }
    }
}

/// Configuration for a whole pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub transform: TransformConfig,
    pub model: ModelConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Load from a file when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.paths.delimiter.is_ascii() {
            return Err(PipelineError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.paths.delimiter
            )));
        }
        let [primary, secondary] = &self.model.aggregate.group_by;
        if primary == secondary {
            return Err(PipelineError::Config(format!(
                "group_by columns must differ, got '{}' twice",
                primary
            )));
        }
        let mut cohorts = self.transform.cohort.iter().chain(&self.model.cohort);
        if let Some(cohort) = cohorts.find(|c| c.noc.trim().is_empty()) {
            return Err(PipelineError::Config(format!(
                "cohort noc must not be empty (team_pattern: {:?})",
                cohort.team_pattern
            )));
        }
        Ok(())
    }
}
