//! repoharvest CLI: run a producer (e.g. `repository --path DIR`) and report what it emitted.

use anyhow::Result;
use repoharvest::engine::{handle_run, parse_args};
use repoharvest::plugins::default_plugins;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut plugins = default_plugins();
    let (cli, matches) = parse_args(&plugins)?;
    handle_run(&cli, &matches, &mut plugins)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
