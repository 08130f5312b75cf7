//! CLI argument definitions using clap derive

use clap::Parser;

use crate::cli::commands::generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "sfdmu-export")]
#[command(author, version, about = "Process CSV files and produce a JSON file.")]
#[command(long_about = "Reads csvw_metadata.json from a Snowfakery output folder, renames each CSV's \
`id` header to `Id` in place, and writes an SFDMU export.json with one Insert object per CSV file.")]
pub struct Cli {
    #[command(flatten)]
    pub args: GenerateArgs,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
