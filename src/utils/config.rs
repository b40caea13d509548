//! Application configuration constants.
//! Names and pool limits in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-root settings file, looked up in the scanned directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Directory names never descended into. Version-control metadata only.
    pub fn default_skip_dirs(&self) -> Vec<String> {
        vec![".git".to_string()]
    }
}

// ---- Reader pool ----

/// Limits for the per-file reader pool.
/// Use [`ReaderPoolLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct ReaderPoolLimits {
    /// Available threads (from rayon); set by [`ReaderPoolLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size.
    pub floor: usize,
    /// Upper bound regardless of what was requested.
    pub max: usize,
}

impl Default for ReaderPoolLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            max: Self::MAX_THREADS,
        }
    }
}

impl ReaderPoolLimits {
    pub const FLOOR_THREADS: usize = 1;
    pub const MAX_THREADS: usize = 256;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }
}
