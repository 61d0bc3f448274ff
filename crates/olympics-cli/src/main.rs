//! Olympics CLI - run the athlete-events ETL pipeline stage by stage.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use olympics::{PipelineConfig, Stage};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract => commands::stage::run(Stage::Extract, config, cli.json, cli.verbose),
        Commands::Transform => {
            commands::stage::run(Stage::Transform, config, cli.json, cli.verbose)
        }
        Commands::Model => commands::stage::run(Stage::Model, config, cli.json, cli.verbose),
        Commands::Run => commands::run::run(config, cli.json, cli.verbose),
    }
}
