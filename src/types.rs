//! Public types for the repoharvest API and pipeline.

use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// One discovered file: its full content plus the path it was read from.
///
/// `id` and `source` are always the same string; there is no separate identity scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub source: String,
    pub content: String,
}

impl Item {
    /// Build an item from a path and the bytes read from it. Invalid UTF-8 is replaced
    /// with U+FFFD; valid UTF-8 is carried unchanged.
    pub fn from_file(path: &Path, bytes: Vec<u8>) -> Self {
        let source = path.display().to_string();
        let content = match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        Item {
            id: source.clone(),
            source,
            content,
        }
    }
}

/// Options for one producer run. Built from defaults, then `.repoharvest.toml`, then CLI flags.
#[derive(Clone, Debug)]
pub struct ProducerOpts {
    /// Size of the reader pool. When None, derived from available threads and the FD limit.
    pub workers: Option<usize>,
    /// Follow symbolic links during the walk.
    pub follow_links: bool,
    /// Strict mode: the first walk error aborts the traversal. Otherwise the entry is skipped.
    pub strict: bool,
    /// Directory names whose whole subtree is never entered (e.g. `.git`).
    pub skip_dirs: Vec<String>,
    /// Leave zero-byte files out of the candidate list.
    pub skip_empty: bool,
}

impl Default for ProducerOpts {
    fn default() -> Self {
        ProducerOpts {
            workers: None,
            follow_links: false,
            strict: true,
            skip_dirs: PackagePaths::get().default_skip_dirs(),
            skip_empty: true,
        }
    }
}

/// Candidates and skipped entries produced by one walk.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Qualifying file paths in enumeration order.
    pub candidates: Vec<PathBuf>,
    /// Entries dropped because of a non-fatal walk error (non-strict mode only).
    pub skipped: Vec<(PathBuf, String)>,
}
