//! Tree scanner: one sequential depth-first walk that builds the candidate list.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ProducerError;
use crate::types::{ProducerOpts, WalkReport};

use super::context::WalkContext;

/// One result from a directory walk.
pub enum WalkOutcome {
    File { path: PathBuf, size: u64 },
    Dir(PathBuf),
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Anything that is not a directory counts
/// as a file, including symlinks when links are not followed.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => {
            if entry.file_type().is_dir() {
                return WalkOutcome::Dir(entry.into_path());
            }
            match entry.metadata() {
                Ok(meta) => WalkOutcome::File {
                    size: meta.len(),
                    path: entry.into_path(),
                },
                Err(err) => WalkOutcome::Err {
                    msg: format!("{}", err),
                    path: Some(entry.into_path()),
                },
            }
        }
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Walk `root` depth-first; directories named in `skip_dirs` are pruned with their subtree.
fn walkdir_iter(root: &Path, ctx: &WalkContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    let filter_ctx = ctx.clone();
    let iter = WalkDir::new(root)
        .follow_links(ctx.follow_links)
        .into_iter()
        .filter_entry(move |e| {
            !(e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| filter_ctx.is_skipped_dir(name)))
        })
        .map(to_outcome_walkdir);
    Box::new(iter)
}

/// Run the walk loop: keep non-empty files, drop directories, handle errors
/// (strict → return the first one; else warn and push to `skipped`).
pub fn run_walk_loop<I>(iter: I, ctx: &WalkContext) -> Result<WalkReport, ProducerError>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut report = WalkReport::default();
    for outcome in iter {
        match outcome {
            WalkOutcome::Dir(_) => {}
            WalkOutcome::File { size: 0, .. } if ctx.skip_empty => {}
            WalkOutcome::File { path, .. } => report.candidates.push(path),
            WalkOutcome::Err { msg, path } => {
                if ctx.strict {
                    return Err(ProducerError::Walk { path, message: msg });
                }
                let path = path.unwrap_or_else(|| PathBuf::from("<no-path>"));
                warn!("skipping {}: {}", path.display(), msg);
                report.skipped.push((path, msg));
            }
        }
    }
    Ok(report)
}

/// Build the candidate list for `root`. The walk finishes before anything is returned.
pub fn scan_tree(root: &Path, opts: &ProducerOpts) -> Result<WalkReport, ProducerError> {
    if root.as_os_str().is_empty() {
        return Err(ProducerError::config("root path is empty"));
    }
    let ctx = WalkContext::from(opts);
    debug!("Walking {} (skip dirs: {:?})", root.display(), ctx.skip_dirs);
    let report = run_walk_loop(walkdir_iter(root, &ctx), &ctx)?;
    debug!(
        "walk: {} candidates, {} skipped",
        report.candidates.len(),
        report.skipped.len()
    );
    Ok(report)
}
