//! CLI command implementations.

pub mod run;
pub mod stage;

use colored::Colorize;
use olympics::StageReport;

/// Print the one-line summary for a finished stage.
pub(crate) fn print_summary(report: &StageReport) {
    let output = report
        .output()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    println!(
        "{} {} rows → {}",
        report.stage.verb().green().bold(),
        report.rows_out.to_string().white().bold(),
        output.cyan()
    );
}
