use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "srp-dashboard")]
#[command(about = "Spatial dashboard for SRP wildlife survey records")]
#[command(version)]
pub struct Cli {
    /// Survey dataset (.csv, .json or .parquet). A file dialog opens when omitted.
    pub input: Option<PathBuf>,

    #[arg(long, help = "JSON file overriding the expected column names")]
    pub columns: Option<PathBuf>,

    #[arg(long, default_value = "srp", help = "Name used in the export file name")]
    pub dataset_name: String,
}
