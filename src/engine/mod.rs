//! Bundled host: argument parsing and the run handler.

pub mod arg_parser;
pub mod cli;

pub use arg_parser::{Cli, build_command, parse_args};
pub use cli::{RunSummary, check_summary, handle_run, summarize};
