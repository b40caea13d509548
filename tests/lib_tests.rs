//! End-to-end tests: walk filtering, emission, completion counting, plugin invocation.

use repoharvest::pipeline::{
    create_channels, drain_until_complete, emit_items, scan_tree, start_producer,
};
use repoharvest::plugins::{Plugin, RepositoryPlugin};
use repoharvest::{Item, ProducerError, ProducerOpts, harvest_dir};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(30);

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// `a.txt` ("hello"), `empty.txt` (0 bytes), `.git/config` (non-empty).
fn scenario_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a.txt", b"hello");
    write(tmp.path(), "empty.txt", b"");
    write(tmp.path(), ".git/config", b"[core]\n\tbare = false\n");
    tmp
}

fn nested_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "README.md", b"# readme\n");
    write(tmp.path(), "src/main.rs", b"fn main() {}\n");
    write(tmp.path(), "src/lib/util.rs", b"pub fn util() {}\n");
    write(tmp.path(), "src/lib/empty.rs", b"");
    write(tmp.path(), "vendor/dep/.git/HEAD", b"ref: refs/heads/main\n");
    write(tmp.path(), "vendor/dep/dep.rs", b"// dep\n");
    fs::create_dir_all(tmp.path().join("empty_dir")).unwrap();
    tmp
}

fn sorted(mut v: Vec<PathBuf>) -> Vec<PathBuf> {
    v.sort();
    v
}

fn sorted_items(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(|a, b| a.source.cmp(&b.source));
    items
}

// --- tree scanner ---

#[test]
fn test_scan_scenario_only_non_empty_file() {
    let tmp = scenario_tree();
    let report = scan_tree(tmp.path(), &ProducerOpts::default()).unwrap();
    assert_eq!(report.candidates, vec![tmp.path().join("a.txt")]);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_scan_nested_skips_vcs_dirs_at_any_depth() {
    let tmp = nested_tree();
    let report = scan_tree(tmp.path(), &ProducerOpts::default()).unwrap();
    let root = tmp.path();
    assert_eq!(
        sorted(report.candidates),
        sorted(vec![
            root.join("README.md"),
            root.join("src/main.rs"),
            root.join("src/lib/util.rs"),
            root.join("vendor/dep/dep.rs"),
        ])
    );
}

#[test]
fn test_scan_never_lists_directories() {
    let tmp = nested_tree();
    let report = scan_tree(tmp.path(), &ProducerOpts::default()).unwrap();
    assert!(report.candidates.iter().all(|p| p.is_file()));
}

#[test]
fn test_scan_custom_skip_dirs() {
    let tmp = nested_tree();
    write(tmp.path(), "node_modules/pkg/index.js", b"module.exports = 1;\n");
    let opts = ProducerOpts {
        skip_dirs: vec![".git".to_string(), "node_modules".to_string(), "src".to_string()],
        ..Default::default()
    };
    let report = scan_tree(tmp.path(), &opts).unwrap();
    let root = tmp.path();
    assert_eq!(
        sorted(report.candidates),
        sorted(vec![root.join("README.md"), root.join("vendor/dep/dep.rs")])
    );
}

#[test]
fn test_scan_keeps_empty_files_when_disabled() {
    let tmp = scenario_tree();
    let opts = ProducerOpts {
        skip_empty: false,
        ..Default::default()
    };
    let report = scan_tree(tmp.path(), &opts).unwrap();
    assert_eq!(
        sorted(report.candidates),
        sorted(vec![tmp.path().join("a.txt"), tmp.path().join("empty.txt")])
    );
}

#[test]
fn test_scan_missing_root_is_walk_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");
    match scan_tree(&missing, &ProducerOpts::default()) {
        Err(ProducerError::Walk { path, .. }) => assert_eq!(path, Some(missing)),
        other => panic!("expected walk error, got {:?}", other),
    }
}

#[test]
fn test_scan_is_repeatable() {
    let tmp = nested_tree();
    let first = scan_tree(tmp.path(), &ProducerOpts::default()).unwrap();
    let second = scan_tree(tmp.path(), &ProducerOpts::default()).unwrap();
    assert_eq!(sorted(first.candidates), sorted(second.candidates));
}

// --- emission ---

#[test]
fn test_harvest_scenario() {
    let tmp = scenario_tree();
    let harvest = harvest_dir(tmp.path(), &ProducerOpts::default()).unwrap();
    assert!(harvest.errors.is_empty());
    assert_eq!(harvest.items.len(), 1);
    let item = &harvest.items[0];
    let expected = tmp.path().join("a.txt").display().to_string();
    assert_eq!(item.source, expected);
    assert_eq!(item.id, item.source);
    assert_eq!(item.content, "hello");
}

#[test]
fn test_harvest_items_match_file_bytes() {
    let tmp = nested_tree();
    let harvest = harvest_dir(tmp.path(), &ProducerOpts::default()).unwrap();
    assert!(harvest.errors.is_empty());
    assert_eq!(harvest.items.len(), 4);
    for item in &harvest.items {
        assert_eq!(item.id, item.source);
        let on_disk = fs::read_to_string(&item.source).unwrap();
        assert_eq!(item.content, on_disk);
    }
}

#[test]
fn test_harvest_twice_yields_same_items() {
    let tmp = nested_tree();
    let first = harvest_dir(tmp.path(), &ProducerOpts::default()).unwrap();
    let second = harvest_dir(tmp.path(), &ProducerOpts::default()).unwrap();
    assert_eq!(sorted_items(first.items), sorted_items(second.items));
}

#[test]
fn test_harvest_single_reader_many_files() {
    let tmp = TempDir::new().unwrap();
    for i in 0..200 {
        write(tmp.path(), &format!("d{}/f{}.txt", i % 7, i), format!("{}", i).as_bytes());
    }
    let opts = ProducerOpts {
        workers: Some(1),
        ..Default::default()
    };
    let harvest = harvest_dir(tmp.path(), &opts).unwrap();
    assert!(harvest.errors.is_empty());
    assert_eq!(harvest.items.len(), 200);
}

#[test]
fn test_harvest_invalid_utf8_is_replaced() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "bin.dat", &[b'o', b'k', 0xff, 0xfe]);
    let harvest = harvest_dir(tmp.path(), &ProducerOpts::default()).unwrap();
    assert_eq!(harvest.items.len(), 1);
    assert_eq!(harvest.items[0].content, "ok\u{FFFD}\u{FFFD}");
}

#[test]
fn test_harvest_missing_root_reports_one_fatal_error() {
    let tmp = TempDir::new().unwrap();
    let harvest = harvest_dir(&tmp.path().join("nope"), &ProducerOpts::default()).unwrap();
    assert!(harvest.items.is_empty());
    assert_eq!(harvest.errors.len(), 1);
    assert!(harvest.errors[0].is_fatal());
    assert!(matches!(harvest.errors[0], ProducerError::Walk { .. }));
}

// --- completion counting ---

#[test]
fn test_counter_done_once_per_file_plus_walk() {
    let tmp = nested_tree();
    let (channels, receivers) = create_channels();
    start_producer(tmp.path(), &ProducerOpts::default(), &channels).unwrap();
    assert!(channels.completion.wait_timeout(WAIT));
    assert_eq!(channels.completion.pending(), 0);
    // 4 candidates + the walk unit.
    assert_eq!(channels.completion.completed(), 5);
    assert_eq!(receivers.items.try_iter().count(), 4);
    assert_eq!(receivers.errors.try_iter().count(), 0);
}

#[test]
fn test_counter_empty_tree_only_walk_unit() {
    let tmp = TempDir::new().unwrap();
    let (channels, receivers) = create_channels();
    start_producer(tmp.path(), &ProducerOpts::default(), &channels).unwrap();
    assert!(channels.completion.wait_timeout(WAIT));
    assert_eq!(channels.completion.completed(), 1);
    assert_eq!(receivers.items.try_iter().count(), 0);
}

#[test]
fn test_file_deleted_after_listing_yields_one_error() {
    let tmp = TempDir::new().unwrap();
    let doomed = write(tmp.path(), "doomed.txt", b"soon gone");
    let report = scan_tree(tmp.path(), &ProducerOpts::default()).unwrap();
    assert_eq!(report.candidates, vec![doomed.clone()]);
    fs::remove_file(&doomed).unwrap();

    let (channels, receivers) = create_channels();
    let dispatched = emit_items(report.candidates, None, &channels);
    assert_eq!(dispatched, 1);
    assert!(channels.completion.wait_timeout(WAIT));
    assert_eq!(channels.completion.completed(), 1);

    assert_eq!(receivers.items.try_iter().count(), 0);
    let errors: Vec<ProducerError> = receivers.errors.try_iter().collect();
    assert_eq!(errors.len(), 1);
    assert!(!errors[0].is_fatal());
    assert_eq!(errors[0].path(), Some(&doomed));
}

#[test]
fn test_drain_delivers_everything_published() {
    let tmp = nested_tree();
    let (channels, receivers) = create_channels();
    start_producer(tmp.path(), &ProducerOpts::default(), &channels).unwrap();
    let mut items = Vec::new();
    let mut errors = Vec::new();
    drain_until_complete(
        &receivers,
        &channels.completion,
        |item| items.push(item),
        |err| errors.push(err),
    );
    assert_eq!(channels.completion.pending(), 0);
    assert_eq!(items.len(), 4);
    assert!(errors.is_empty());
}

// --- plugin ---

#[test]
fn test_plugin_missing_path_publishes_nothing() {
    let plugin = RepositoryPlugin::default();
    let (channels, receivers) = create_channels();
    let res = plugin.define_command().try_get_matches_from(["repository"]);
    assert!(res.is_err());
    assert_eq!(channels.completion.pending(), 0);
    assert_eq!(channels.completion.completed(), 0);
    assert_eq!(receivers.items.try_iter().count(), 0);
    assert_eq!(receivers.errors.try_iter().count(), 0);
}

#[test]
fn test_plugin_run_returns_before_completion_is_observed() {
    let tmp = scenario_tree();
    let mut plugin = RepositoryPlugin::default();
    let matches = plugin
        .define_command()
        .try_get_matches_from(["repository", "--path", tmp.path().to_str().unwrap()])
        .unwrap();
    let (channels, receivers) = create_channels();
    plugin.run(&matches, &channels).unwrap();
    assert!(channels.completion.wait_timeout(WAIT));
    let items: Vec<Item> = receivers.items.try_iter().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "hello");
    assert_eq!(plugin.path.as_deref(), Some(tmp.path()));
}

#[test]
fn test_plugin_reads_settings_file_from_root() {
    let tmp = nested_tree();
    write(
        tmp.path(),
        ".repoharvest.toml",
        b"[settings]\nskip_dirs = [\".git\", \"src\", \"vendor\"]\nworkers = 2\n",
    );
    let mut plugin = RepositoryPlugin::default();
    let matches = plugin
        .define_command()
        .try_get_matches_from(["repository", "--path", tmp.path().to_str().unwrap()])
        .unwrap();
    let (channels, receivers) = create_channels();
    plugin.run(&matches, &channels).unwrap();
    assert!(channels.completion.wait_timeout(WAIT));
    let mut sources: Vec<String> = receivers.items.try_iter().map(|i| i.source).collect();
    sources.sort();
    let root = tmp.path();
    let mut expected = vec![
        root.join(".repoharvest.toml").display().to_string(),
        root.join("README.md").display().to_string(),
    ];
    expected.sort();
    assert_eq!(sources, expected);
}

#[cfg(unix)]
#[test]
fn test_symlink_to_file_is_emitted_with_link_path() {
    let tmp = TempDir::new().unwrap();
    let target = write(tmp.path(), "real.txt", b"target");
    let link = tmp.path().join("link.txt");
    std::os::unix::fs::symlink(&target, &link).unwrap();
    let harvest = harvest_dir(tmp.path(), &ProducerOpts::default()).unwrap();
    let mut items = sorted_items(harvest.items);
    assert_eq!(items.len(), 2);
    let linked = items.remove(0);
    assert_eq!(linked.source, link.display().to_string());
    assert_eq!(linked.content, "target");
}
