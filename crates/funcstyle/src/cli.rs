use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::{config::Config, types::Direction};

/// Restyle a FunC project between snake_case and camelCase
///
/// The entry file and every source it reaches through `#include` are written,
/// restyled, to the same relative paths under the output directory.
#[derive(Debug, Parser)]
#[command(name = "funcstyle", version, about)]
pub struct Cli {
    /// Entry FunC source file
    pub file: PathBuf,

    /// Output directory, relative to the project root unless absolute [default: result]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Direction: 1 or camel (snake -> camel), 2 or snake (camel -> snake) [default: 1]
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<Direction>,

    /// Configuration file to use instead of `funcstyle.toml` beside the entry file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root; includes may not leave it [default: entry file directory]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Run everything but write no files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Flags win over every configuration file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(root) = &self.root {
            config.root = Some(root.clone());
        }
        if self.dry_run {
            config.dry_run = true;
        }
    }
}
