//! Error types for drop-catcher
//!
//! None of these are fatal: the round either continues or the command is
//! dropped. Shells log them and move on.

use thiserror::Error;

use crate::sim::{DropId, RoundPhase};

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// No difficulty preset with this name
    #[error("Unknown difficulty profile: {0}")]
    UnknownProfile(String),

    /// Command not valid in the current round phase
    #[error("Cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: RoundPhase,
    },

    /// Drop was already caught or expired (or never existed)
    #[error("Drop {0} is not live")]
    UnknownDrop(DropId),

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the expected, ignorable outcomes of racing input
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            Error::InvalidTransition { .. } | Error::UnknownDrop(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
