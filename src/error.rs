//! Errors published on the error sink.

use std::path::PathBuf;

use thiserror::Error;

/// Everything a producer can report. Configuration errors are returned to the caller;
/// walk and read errors travel over the error channel.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// Missing or invalid option. Nothing was walked.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The producer could not be started (e.g. thread spawn failed). Nothing was walked.
    #[error("failed to start producer: {message}")]
    Start { message: String },

    /// Enumerating the tree failed. The walk stopped and no file was dispatched.
    #[error("walk error at {}: {message}", display_opt(.path))]
    Walk {
        path: Option<PathBuf>,
        message: String,
    },

    /// One candidate could not be read. Other files are unaffected.
    #[error("read error at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProducerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Everything but a read error ends the run; a read error only costs one file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Read { .. })
    }

    /// Path the error refers to, when known.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Config { .. } | Self::Start { .. } => None,
            Self::Walk { path, .. } => path.as_ref(),
            Self::Read { path, .. } => Some(path),
        }
    }
}

fn display_opt(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}
