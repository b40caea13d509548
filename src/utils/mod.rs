pub mod config;
pub mod fd_limit;
pub mod logger;
pub mod repoharvest_toml;

pub use config::*;
pub use fd_limit::{FDS_PER_READER, max_open_fds, max_readers_by_fd_limit, readers_for_fd_limit};
pub use logger::{log_label, setup_logging};
pub use repoharvest_toml::{apply_file_to_opts, load_repoharvest_toml};
