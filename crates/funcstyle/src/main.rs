use std::{path::Path, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use funcstyle::{cli::Cli, config::Config, orchestrator::Orchestrator};
use log::{debug, error};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let project_dir = cli
        .file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut config =
        Config::load(cli.config.as_deref(), project_dir).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    debug!("Resolved configuration: {config:?}");

    let report = Orchestrator::new(&config, &cli.file)?.run()?;

    for file in &report.files {
        debug!("{} -> {}", file.input.display(), file.output.display());
    }
    Ok(())
}
