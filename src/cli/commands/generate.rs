//! Default command - build export.json for a Snowfakery output folder

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::pluralize;
use crate::cli::table::outcome_table;
use crate::cli::GlobalOpts;
use crate::core::pipeline::{self, FileOutcome};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// The path to the SnowFakery folder
    #[arg(value_name = "SNOWFAKERYFOLDER")]
    pub folder: PathBuf,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(&args.folder);

    if global.verbose {
        println!(
            "{} Reading {} from {}",
            style("→").blue(),
            style(config.metadata_file()).cyan(),
            style(args.folder.display()).yellow()
        );
    }

    let report = pipeline::run_with(&args.folder, &config, |outcome| {
        report_outcome(outcome, global)
    })?;

    if global.quiet {
        return Ok(());
    }

    if global.verbose {
        println!();
        println!("{}", outcome_table(&report.outcomes));
        println!();
    }

    println!(
        "{} Wrote {} with {}",
        style("✓").green(),
        style(report.export_path.display()).yellow(),
        pluralize(report.processed_count(), "object")
    );

    let skipped = report.failure_count();
    if skipped > 0 {
        println!(
            "  {} skipped",
            style(pluralize(skipped, "file")).red()
        );
    }

    Ok(())
}

/// Per-file errors always go to stderr; successes only when verbose
fn report_outcome(outcome: &FileOutcome, global: &GlobalOpts) {
    match &outcome.result {
        Ok(processed) => {
            if global.verbose {
                println!(
                    "{} {} -> {}",
                    style("✓").green(),
                    outcome.file,
                    style(&processed.descriptor.query).dim()
                );
            }
        }
        Err(e) => {
            eprintln!("{} Error: {}", style("✗").red(), e);
        }
    }
}
