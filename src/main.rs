mod cli;
mod error;
mod manifest;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use crate::manifest::ManifestImporter;
use clap::Parser;
use exn::ResultExt;
use std::io;
use std::process::ExitCode;
use unravel_config::Config;
use unravel_pipeline::Context;
use unravel_pipeline::stage::{ArchiveStage, ImportHost, ImportReport};

/// Some archives were skipped, but everything else was imported.
const EXIT_PARTIAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(cli.log_level()).init();

    match run(&cli) {
        Ok(report) if report.failures.is_empty() => ExitCode::SUCCESS,
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("skipped {}: {:?}", failure.path.display(), failure.error);
            }
            ExitCode::from(EXIT_PARTIAL)
        },
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<ImportReport> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    tracing::info!(cache_dir = %config.cache_dir.display(), "using extraction cache");

    let ctx = Context::new(&config.cache_dir);
    let stage = ArchiveStage::new(ctx, config.selection.clone(), config.container.clone());
    let mut host = ImportHost::new(ManifestImporter::new(io::stdout().lock())).with_stage(stage);
    let report = host.import(&cli.into, cli.files.clone(), config.selection.raw_files).or_raise(|| ErrorKind::Import)?;
    if report.suppressed {
        tracing::info!("no files outside archives; nothing imported into {}", cli.into);
    }
    Ok(report)
}
