//! Run command - execute every stage in order.

use colored::Colorize;
use olympics::{Pipeline, PipelineConfig};

use super::print_summary;

pub fn run(
    config: PipelineConfig,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::with_config(config);

    if verbose && !json_output {
        println!(
            "{} {} → {} → {}",
            "Running".cyan().bold(),
            pipeline.config().paths.input_dir.display(),
            pipeline.config().paths.raw_dir.display(),
            pipeline.config().paths.processed_dir.display()
        );
    }

    let reports = pipeline.run_all()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_summary(report);
        }
    }

    Ok(())
}
