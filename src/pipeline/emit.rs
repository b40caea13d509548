//! Item emitter: reads every candidate on a fixed-size reader pool and publishes exactly one
//! item or one error per path.

use crossbeam_channel::{Receiver, unbounded};
use log::{debug, error, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::error::ProducerError;
use crate::types::Item;
use crate::utils::config::{PackagePaths, ReaderPoolLimits};
use crate::utils::fd_limit::max_readers_by_fd_limit;

use super::context::Channels;

/// Read `path` fully into an [`Item`]. No retry.
pub fn read_item(path: &Path) -> Result<Item, ProducerError> {
    let bytes = std::fs::read(path).map_err(|source| ProducerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Item::from_file(path, bytes))
}

/// Read one path and publish the outcome. A closed sink means the host stopped listening.
fn publish_one(path: &Path, channels: &Channels) {
    match read_item(path) {
        Ok(item) => {
            if channels.items.send(item).is_err() {
                debug!("item sink closed; dropping {}", path.display());
            }
        }
        Err(err) => {
            debug!("{}", err);
            if channels.errors.send(err).is_err() {
                debug!("error sink closed; dropping error for {}", path.display());
            }
        }
    }
}

/// Single reader: take paths from path_rx until it closes; one `done` per path, even if
/// publishing panics.
fn reader_loop(path_rx: Receiver<PathBuf>, channels: Channels) {
    while let Ok(path) = path_rx.recv() {
        let _unit = channels.completion.guard();
        publish_one(&path, &channels);
    }
}

/// Start reader thread `index`. Fails with the OS error when the thread cannot be created.
pub fn spawn_reader(
    index: usize,
    path_rx: Receiver<PathBuf>,
    channels: Channels,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("{}-reader-{}", PackagePaths::get().pkg_name(), index))
        .spawn(move || reader_loop(path_rx, channels))
}

/// Start up to `num_readers` readers with `spawn`, stopping at the first refusal. Returns the
/// readers that are running; they exit once every sender of `path_rx` is dropped.
pub fn spawn_readers_with<S>(
    path_rx: Receiver<PathBuf>,
    channels: &Channels,
    num_readers: usize,
    mut spawn: S,
) -> Vec<JoinHandle<()>>
where
    S: FnMut(usize, Receiver<PathBuf>, Channels) -> io::Result<JoinHandle<()>>,
{
    let mut handles = Vec::with_capacity(num_readers);
    for index in 0..num_readers {
        match spawn(index, path_rx.clone(), channels.clone()) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                warn!(
                    "reader {} of {} failed to start ({}); continuing with {}",
                    index + 1,
                    num_readers,
                    err,
                    handles.len()
                );
                break;
            }
        }
    }
    handles
}

/// Spawn `num_readers` reader threads sharing `path_rx`.
pub fn spawn_readers(
    path_rx: Receiver<PathBuf>,
    channels: &Channels,
    num_readers: usize,
) -> Vec<JoinHandle<()>> {
    spawn_readers_with(path_rx, channels, num_readers, spawn_reader)
}

/// Pool size from a request, the thread limits and an optional FD cap. Never more readers
/// than candidates, never fewer than the floor.
pub fn pool_size(
    requested: Option<usize>,
    candidates: usize,
    limits: ReaderPoolLimits,
    fd_cap: Option<usize>,
) -> usize {
    let mut n = requested.unwrap_or(limits.all_threads).min(limits.max);
    if let Some(cap) = fd_cap {
        n = n.min(cap);
    }
    n.max(limits.floor).min(candidates.max(1))
}

/// [`pool_size`] with the current thread count and the process FD limit.
pub fn reader_pool_size(requested: Option<usize>, candidates: usize) -> usize {
    pool_size(
        requested,
        candidates,
        ReaderPoolLimits::current(),
        max_readers_by_fd_limit(),
    )
}

/// Dispatch every candidate to the reader pool. Registers one pending unit per candidate
/// before queueing it; returns once all are queued, not once they are read.
pub fn emit_items(candidates: Vec<PathBuf>, workers: Option<usize>, channels: &Channels) -> usize {
    emit_items_with(candidates, workers, channels, spawn_reader)
}

/// [`emit_items`] with a custom reader spawner. Units that can no longer run are released, so
/// the counter still reaches zero when threads are refused. If no reader starts at all, one
/// [`ProducerError::Start`] is published and nothing is dispatched.
pub fn emit_items_with<S>(
    candidates: Vec<PathBuf>,
    workers: Option<usize>,
    channels: &Channels,
    spawn: S,
) -> usize
where
    S: FnMut(usize, Receiver<PathBuf>, Channels) -> io::Result<JoinHandle<()>>,
{
    let total = candidates.len();
    if total == 0 {
        return 0;
    }
    let num_readers = reader_pool_size(workers, total);
    debug!("dispatching {} files to {} readers", total, num_readers);

    let (path_tx, path_rx) = unbounded::<PathBuf>();
    channels.completion.add(total);
    // Detached: completion is observed through the counter, not by joining.
    let readers = spawn_readers_with(path_rx, channels, num_readers, spawn);
    if readers.is_empty() {
        for _ in 0..total {
            channels.completion.done();
        }
        let err = ProducerError::Start {
            message: format!("no reader thread could be started for {} files", total),
        };
        error!("{}", err);
        if channels.errors.send(err).is_err() {
            debug!("error sink closed; start error dropped");
        }
        return 0;
    }

    let mut dispatched = 0_usize;
    for path in candidates {
        if path_tx.send(path).is_err() {
            break;
        }
        dispatched += 1;
    }
    // Every reader is gone; release the units nobody will run.
    for _ in dispatched..total {
        channels.completion.done();
    }
    drop(path_tx);
    dispatched
}
