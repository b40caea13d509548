//! Load `.repoharvest.toml` from the scanned root. Values here sit between built-in defaults and CLI flags.

use serde::Deserialize;
use std::path::Path;

use crate::ProducerOpts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct RepoharvestToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    workers: Option<usize>,
    follow_links: Option<bool>,
    strict: Option<bool>,
    skip_dirs: Option<Vec<String>>,
    skip_empty: Option<bool>,
}

/// Parse settings text. Errors carry the toml position.
pub fn parse_repoharvest_toml(s: &str) -> Result<RepoharvestToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load the settings file from `dir` if present. Returns None if missing, unreadable, or invalid (logged).
pub fn load_repoharvest_toml(dir: &Path) -> Option<RepoharvestToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_repoharvest_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $field:ident) => {
        if let Some(v) = $idx.$field {
            $opts.$field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &RepoharvestToml, opts: &mut ProducerOpts) {
    let s = &file.settings;
    if let Some(n) = s.workers {
        opts.workers = Some(n);
    }
    apply_file_opt!(s, opts, follow_links);
    apply_file_opt!(s, opts, strict);
    apply_file_opt!(s, opts, skip_empty);
    if let Some(ref dirs) = s.skip_dirs {
        opts.skip_dirs = dirs.clone();
    }
}

