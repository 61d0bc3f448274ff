//! Single-stage commands: extract, transform, model.

use colored::Colorize;
use olympics::{Pipeline, PipelineConfig, Stage};

use super::print_summary;

pub fn run(
    stage: Stage,
    config: PipelineConfig,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::with_config(config);

    if verbose && !json_output {
        println!("{} {}", "Running".cyan().bold(), stage.to_string().white());
    }

    let report = pipeline.run(stage)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
        if verbose {
            println!("  rows read: {}", report.rows_in);
            for extra in report.outputs.iter().skip(1) {
                println!("  also wrote: {}", extra.display());
            }
        }
    }

    Ok(())
}
