//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// Expand archives (recursively) and list the files an importer would receive.
///
/// Each batch is printed to stdout as `<container>\t<path>` lines. Files
/// extracted from archives go into the configured archive container; all
/// other files go into the container named by `--into`.
#[derive(Parser, Debug)]
#[command(name = "unravel", version, about)]
pub struct Cli {
    /// Config file (TOML, YAML or JSON). Environment variables prefixed with
    /// `UNRAVEL_` override it.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the extraction cache directory.
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Container for files that are not archives.
    #[arg(long, value_name = "CONTAINER", default_value = "Import")]
    pub into: String,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(short, long = "verbose", action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Files to import.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
