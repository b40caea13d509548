use log::{debug, error, warn};

use crate::error::ProducerError;
use crate::types::WalkReport;

use super::context::Channels;

/// Log entries the walk skipped in non-strict mode. Individual paths only at debug level.
pub fn report_skipped_paths(report: &WalkReport) {
    let skipped = report.skipped.len();
    if skipped == 0 {
        return;
    }
    warn!(
        "Skipped {} paths due to permission errors or access issues",
        skipped
    );
    for (path, msg) in &report.skipped {
        debug!("  skipped: {} ({})", path.display(), msg);
    }
}

/// Publish a walk-level failure on the error sink. The host decides whether it ends the process.
pub fn publish_walk_error(err: ProducerError, channels: &Channels) {
    error!("{}", err);
    if channels.errors.send(err).is_err() {
        debug!("error sink closed; walk error dropped");
    }
}
