//! Host run handler: start the matched producer, drain its channels, report, pick the exit status.

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, error, info, warn};

use crate::engine::arg_parser::Cli;
use crate::pipeline::{CompletionCounter, Receivers, create_channels, drain_until_complete};
use crate::plugins::Plugin;
use crate::utils::setup_logging;

/// Counts gathered while draining one run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub items: usize,
    pub bytes: usize,
    pub read_errors: usize,
    pub fatal_errors: usize,
}

/// Drain `receivers` until `completion` reaches zero and count what arrived.
/// Errors are logged as they arrive; with `list`, every item source goes to stdout.
pub fn summarize(receivers: &Receivers, completion: &CompletionCounter, list: bool) -> RunSummary {
    let mut summary = RunSummary::default();
    drain_until_complete(
        receivers,
        completion,
        |item| {
            summary.items += 1;
            summary.bytes += item.content.len();
            if list {
                println!("{}", item.source);
            }
        },
        |err| {
            if err.is_fatal() {
                error!("{}", err);
                summary.fatal_errors += 1;
            } else {
                warn!("{}", err);
                summary.read_errors += 1;
            }
        },
    );
    summary
}

/// Exit policy: fatal errors always fail the run; read errors only with `--fail-on-error`.
pub fn check_summary(summary: &RunSummary, fail_on_error: bool) -> Result<()> {
    if summary.fatal_errors > 0 {
        anyhow::bail!("run aborted after {} fatal error(s)", summary.fatal_errors);
    }
    if fail_on_error && summary.read_errors > 0 {
        anyhow::bail!("{} file(s) could not be read", summary.read_errors);
    }
    Ok(())
}

/// Run the plugin named by the matched subcommand and wait for it to drain.
pub fn handle_run(cli: &Cli, matches: &ArgMatches, plugins: &mut [Box<dyn Plugin>]) -> Result<()> {
    let (name, sub_matches) = matches.subcommand().context("no command given")?;
    setup_logging(cli.verbose(), Some(name));
    let plugin = plugins
        .iter_mut()
        .find(|p| p.name() == name)
        .with_context(|| format!("no plugin registered for '{}'", name))?;

    let (channels, receivers) = create_channels();
    debug!("Running {}...", name);
    plugin
        .run(sub_matches, &channels)
        .with_context(|| format!("error while initializing plugin '{}'", name))?;

    let summary = summarize(&receivers, &channels.completion, cli.list());
    info!(
        "{}: {} items ({} bytes), {} unreadable",
        name, summary.items, summary.bytes, summary.read_errors
    );
    check_summary(&summary, cli.fail_on_error())
}
