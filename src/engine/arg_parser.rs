use anyhow::Result;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::plugins::{Plugin, register_commands};

/// Host for content producers: runs one producer and reports what it emitted.
#[derive(Clone, Debug, Parser)]
#[command(name = "repoharvest")]
#[command(about = "Run a producer and report the items it emits.")]
pub struct Cli {
    /// Verbose output.
    #[arg(long, short = 'v', global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print the source of every emitted item on stdout.
    #[arg(long, short = 'l', global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub list: Option<bool>,

    /// Exit non-zero when any file could not be read (walk errors always do).
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub fail_on_error: Option<bool>,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    pub fn list(&self) -> bool {
        self.list.unwrap_or(false)
    }

    pub fn fail_on_error(&self) -> bool {
        self.fail_on_error.unwrap_or(false)
    }
}

/// Host command with every plugin mounted as a subcommand.
pub fn build_command(plugins: &[Box<dyn Plugin>]) -> clap::Command {
    register_commands(Cli::command(), plugins)
        .subcommand_required(true)
        .arg_required_else_help(true)
}

/// Parse the process arguments. Usage errors (e.g. a missing `--path`) exit here, before any work.
pub fn parse_args(plugins: &[Box<dyn Plugin>]) -> Result<(Cli, ArgMatches)> {
    let matches = build_command(plugins).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;
    Ok((cli, matches))
}

