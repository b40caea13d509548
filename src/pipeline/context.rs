//! Coordination bundle: the item sink, error sink and completion counter shared between
//! a producer and its host, plus the walk settings handed to the scanner.

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::ProducerError;
use crate::types::{Item, ProducerOpts};

use super::counter::CompletionCounter;

/// Producer side of the bundle. Cheap to clone; every unit of work gets its own clone.
#[derive(Clone, Debug)]
pub struct Channels {
    pub items: Sender<Item>,
    pub errors: Sender<ProducerError>,
    pub completion: CompletionCounter,
}

/// Host side of the bundle.
pub struct Receivers {
    pub items: Receiver<Item>,
    pub errors: Receiver<ProducerError>,
}

/// Build a bundle with unbounded item and error channels.
pub fn create_channels() -> (Channels, Receivers) {
    let (items_tx, items_rx) = unbounded::<Item>();
    let (errors_tx, errors_rx) = unbounded::<ProducerError>();
    (
        Channels {
            items: items_tx,
            errors: errors_tx,
            completion: CompletionCounter::new(),
        },
        Receivers {
            items: items_rx,
            errors: errors_rx,
        },
    )
}

/// Walk settings taken from [`ProducerOpts`].
#[derive(Clone, Debug)]
pub struct WalkContext {
    pub follow_links: bool,
    pub strict: bool,
    pub skip_dirs: Vec<String>,
    pub skip_empty: bool,
}

impl From<&ProducerOpts> for WalkContext {
    fn from(o: &ProducerOpts) -> Self {
        WalkContext {
            follow_links: o.follow_links,
            strict: o.strict,
            skip_dirs: o.skip_dirs.clone(),
            skip_empty: o.skip_empty,
        }
    }
}

impl WalkContext {
    /// True if `name` is a directory the walk must not enter.
    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }
}
