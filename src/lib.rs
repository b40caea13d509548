//! repoharvest: repository producer for content-ingestion pipelines.
//!
//! Walks a local tree once, drops version-control metadata directories and empty files, then
//! reads every remaining file on a bounded reader pool and publishes one [`Item`] (or one
//! error) per file over a shared [`Channels`](pipeline::Channels) bundle.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod plugins;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::ProducerError;
pub use types::*;

use log::debug;
use std::path::Path;

/// Result alias used by public repoharvest API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: run a producer over `root` with `opts` and block until every unit is done.
///
/// Returns the items and errors in arrival order. For streaming, build a bundle with
/// [`create_channels`](pipeline::create_channels) and call
/// [`start_producer`](pipeline::start_producer) yourself.
pub fn harvest_dir(root: &Path, opts: &ProducerOpts) -> Result<pipeline::Harvest> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    let (channels, receivers) = pipeline::create_channels();
    pipeline::collect(root, opts, &channels, &receivers)
}
