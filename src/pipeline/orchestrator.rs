use anyhow::{Context, Result};
use crossbeam_channel::select;
use log::debug;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::ProducerError;
use crate::types::{Item, ProducerOpts};
use crate::utils::config::PackagePaths;

use super::context::{Channels, Receivers};
use super::counter::CompletionCounter;
use super::emit::emit_items;
use super::error_handler::{publish_walk_error, report_skipped_paths};
use super::walk::scan_tree;

/// How often an idle drain loop re-checks the completion counter.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Walk `root`, then hand every candidate to the emitter. Returns how many were dispatched.
/// A walk error is published and nothing is dispatched.
pub fn walk_and_dispatch(root: &Path, opts: &ProducerOpts, channels: &Channels) -> usize {
    let report = match scan_tree(root, opts) {
        Ok(report) => report,
        Err(err) => {
            publish_walk_error(err, channels);
            return 0;
        }
    };
    report_skipped_paths(&report);
    let dispatched = emit_items(report.candidates, opts.workers, channels);
    debug!("walk: dispatched {} files under {}", dispatched, root.display());
    dispatched
}

/// Start a producer for `root` in the background and return at once.
///
/// One pending unit is registered for the walk itself before the thread starts; it is marked
/// done once every candidate has been dispatched. The run is over when `channels.completion`
/// drops to zero.
pub fn start_producer(
    root: &Path,
    opts: &ProducerOpts,
    channels: &Channels,
) -> Result<JoinHandle<()>> {
    let root: PathBuf = root.to_path_buf();
    let opts = opts.clone();
    let channels = channels.clone();
    channels.completion.add(1);
    let completion = channels.completion.clone();
    thread::Builder::new()
        .name(format!("{}-walk", PackagePaths::get().pkg_name()))
        .spawn(move || {
            // Released on return or unwind.
            let _walk_unit = channels.completion.guard();
            walk_and_dispatch(&root, &opts, &channels);
        })
        // The closure never ran, so the walk unit has no guard yet.
        .inspect_err(|_| completion.done())
        .context("spawn walk thread")
}

/// Drain both receivers until the counter reaches zero, calling `on_item` / `on_error` for each
/// message. Everything published before the last `done` is delivered.
pub fn drain_until_complete<FI, FE>(
    receivers: &Receivers,
    completion: &CompletionCounter,
    mut on_item: FI,
    mut on_error: FE,
) where
    FI: FnMut(Item),
    FE: FnMut(ProducerError),
{
    loop {
        select! {
            recv(receivers.items) -> msg => match msg {
                Ok(item) => on_item(item),
                Err(_) => break,
            },
            recv(receivers.errors) -> msg => match msg {
                Ok(err) => on_error(err),
                Err(_) => break,
            },
            default(DRAIN_POLL_INTERVAL) => {
                if completion.pending() == 0 {
                    break;
                }
            }
        }
    }
    // Units publish before calling done, so whatever is left is already queued.
    for item in receivers.items.try_iter() {
        on_item(item);
    }
    for err in receivers.errors.try_iter() {
        on_error(err);
    }
}

/// Everything one run produced, in arrival order.
#[derive(Debug, Default)]
pub struct Harvest {
    pub items: Vec<Item>,
    pub errors: Vec<ProducerError>,
}

/// Run a producer over `root` and collect its output once the counter reaches zero.
pub fn collect(
    root: &Path,
    opts: &ProducerOpts,
    channels: &Channels,
    receivers: &Receivers,
) -> Result<Harvest> {
    start_producer(root, opts, channels)?;
    let mut harvest = Harvest::default();
    drain_until_complete(
        receivers,
        &channels.completion,
        |item| harvest.items.push(item),
        |err| harvest.errors.push(err),
    );
    debug!(
        "main: counter reached zero, {} items, {} errors",
        harvest.items.len(),
        harvest.errors.len()
    );
    Ok(harvest)
}
