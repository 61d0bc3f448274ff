//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Olympics: batch ETL over the Olympic athlete-events dataset
#[derive(Parser)]
#[command(name = "olympics")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pipeline configuration file (TOML); defaults apply when omitted
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print stage reports as JSON instead of a summary line
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy the source CSVs from input/ into raw/
    Extract,

    /// Clean the raw athletes, join NOC regions, write the cleaned table
    Transform,

    /// Summarize medals per year and sport for the model cohort
    Model,

    /// Run extract, transform and model in order
    Run,
}
