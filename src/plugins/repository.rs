//! `repository` producer: emits every non-empty file under a local directory.

use clap::{ArgMatches, Args, Command, FromArgMatches};
use log::debug;
use std::path::{Path, PathBuf};

use crate::ProducerOpts;
use crate::error::ProducerError;
use crate::pipeline::{Channels, start_producer};
use crate::utils::{apply_file_to_opts, load_repoharvest_toml};

use super::Plugin;

/// Name of the required path option.
pub const ARG_PATH: &str = "path";

/// Flags of the `repository` command.
#[derive(Clone, Debug, Args)]
pub struct RepositoryArgs {
    /// Local repository path [required]
    #[arg(long = ARG_PATH, value_name = "PATH")]
    pub path: PathBuf,

    /// Reader pool size. Default: available threads, capped by the FD limit.
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Strict mode: abort the walk on the first enumeration error (default). `--strict false` skips the entry instead.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,
}

impl RepositoryArgs {
    /// Layer these flags over `opts` (only flags that were given).
    pub fn apply_to_opts(&self, opts: &mut ProducerOpts) {
        if self.workers.is_some() {
            opts.workers = self.workers;
        }
        if let Some(v) = self.follow_links {
            opts.follow_links = v;
        }
        if let Some(v) = self.strict {
            opts.strict = v;
        }
    }
}

/// Scans one local directory per invocation.
#[derive(Debug, Default)]
pub struct RepositoryPlugin {
    /// Root of the last configured invocation.
    pub path: Option<PathBuf>,
}

impl RepositoryPlugin {
    /// Resolve the root and options for one invocation: defaults, then `.repoharvest.toml`
    /// in the root, then flags. An empty `--path` never gets here; clap's path parser rejects it.
    pub fn configure(&mut self, matches: &ArgMatches) -> Result<ProducerOpts, ProducerError> {
        let args = RepositoryArgs::from_arg_matches(matches).map_err(|e| {
            ProducerError::config(format!(
                "error while getting '{}' flag value: {}",
                ARG_PATH, e
            ))
        })?;

        let mut opts = ProducerOpts::default();
        if let Some(file) = load_repoharvest_toml(&args.path) {
            apply_file_to_opts(&file, &mut opts);
        }
        args.apply_to_opts(&mut opts);
        debug!("{} CONFIG: {:#?}", self.name_upper(), opts);

        self.path = Some(args.path);
        Ok(opts)
    }

    fn name_upper(&self) -> String {
        self.name().to_uppercase()
    }

    /// Start the background walk for an already resolved root.
    pub fn start(
        &self,
        root: &Path,
        opts: &ProducerOpts,
        channels: &Channels,
    ) -> Result<(), ProducerError> {
        start_producer(root, opts, channels)
            .map(|_detached| ())
            .map_err(|e| ProducerError::Start {
                message: format!("{:#}", e),
            })
    }
}

impl Plugin for RepositoryPlugin {
    fn name(&self) -> &'static str {
        "repository"
    }

    fn define_command(&self) -> Command {
        let cmd = Command::new(self.name())
            .override_usage(format!("{} --{} PATH", self.name(), ARG_PATH))
            .about("Scan local repository")
            .long_about("Scan a local repository and emit the content of every non-empty file");
        RepositoryArgs::augment_args(cmd)
    }

    fn run(&mut self, matches: &ArgMatches, channels: &Channels) -> Result<(), ProducerError> {
        let opts = self.configure(matches)?;
        let root = self
            .path
            .clone()
            .ok_or_else(|| ProducerError::config("repository path was not resolved"))?;
        self.start(&root, &opts, channels)
    }
}
