//! Pipeline components: coordination bundle, walk, emitter, orchestration.

pub mod context;
pub mod counter;
pub mod emit;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;

pub use context::{Channels, Receivers, WalkContext, create_channels};
pub use counter::{CompletionCounter, UnitGuard};
pub use emit::{
    emit_items, emit_items_with, read_item, reader_pool_size, spawn_reader, spawn_readers,
    spawn_readers_with,
};
pub use error_handler::{publish_walk_error, report_skipped_paths};
pub use orchestrator::{Harvest, collect, drain_until_complete, start_producer, walk_and_dispatch};
pub use walk::{WalkOutcome, run_walk_loop, scan_tree, to_outcome_walkdir};
