use colored::Colorize;
use env_logger::Builder;
use log::Level;
use std::io::Write;

use crate::utils::config::PackagePaths;

/// Prefix for every log line: the package name, plus the running command when there is one
/// (e.g. `repoharvest:repository`), so output from several producers in one host stays apart.
pub fn log_label(command: Option<&str>) -> String {
    let pkg = PackagePaths::get().pkg_name();
    match command {
        Some(cmd) if !cmd.is_empty() => format!("{pkg}:{cmd}"),
        _ => pkg.to_string(),
    }
}

/// Install the process logger. Safe to call more than once; later calls are no-ops.
pub fn setup_logging(verbose: bool, command: Option<&str>) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let label = log_label(command);

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .format(move |buf, record| {
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    // Module path without the crate prefix; the label already names the crate.
                    let target = record.target();
                    let module = target
                        .split_once("::")
                        .map_or(target, |(_, rest)| rest)
                        .white();
                    format!("[{} {} {}] {}", label.cyan(), level_str, module, record.args())
                }
                _ => format!("[{}] {}", label.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
