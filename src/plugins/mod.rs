//! Plugin contract between a host and its producers.
//!
//! A host mounts each plugin's command as a subcommand, parses the command line, and calls
//! [`Plugin::run`] on the one that matched with a shared [`Channels`] bundle. The host owns the
//! receivers and decides when the run is over by watching the completion counter.

pub mod repository;

use clap::{ArgMatches, Command};

use crate::error::ProducerError;
use crate::pipeline::Channels;

pub use repository::{ARG_PATH, RepositoryArgs, RepositoryPlugin};

pub trait Plugin: Send {
    /// Subcommand name.
    fn name(&self) -> &'static str;

    /// Command surface: name, flags, help text.
    fn define_command(&self) -> Command;

    /// Start producing for one invocation and return without waiting for the work.
    /// Configuration problems are returned here and never published.
    fn run(&mut self, matches: &ArgMatches, channels: &Channels) -> Result<(), ProducerError>;
}

/// Plugins the bundled host registers.
pub fn default_plugins() -> Vec<Box<dyn Plugin>> {
    vec![Box::new(RepositoryPlugin::default())]
}

/// Mount every plugin's command on `root` as a subcommand.
pub fn register_commands(root: Command, plugins: &[Box<dyn Plugin>]) -> Command {
    plugins
        .iter()
        .fold(root, |cmd, plugin| cmd.subcommand(plugin.define_command()))
}
