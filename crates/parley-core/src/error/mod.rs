use error_location::ErrorLocation;
use thiserror::Error;

/// Session lifecycle errors with source location tracking.
///
/// Only acquisition and finalization failures are surfaced. Cancellation
/// never produces one of these; failures on that path are logged and dropped.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The platform denied or could not provide the audio capability.
    #[error("Audio hardware unavailable: {reason} {location}")]
    HardwareUnavailable {
        /// Description of why the hardware could not be acquired.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder could not hand back a finished clip.
    #[error("Failed to finalize capture: {reason} {location}")]
    CaptureFinalizeFailed {
        /// Description of the finalization failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The player rejected a play, pause or rate change.
    #[error("Playback failed: {reason} {location}")]
    PlaybackFailed {
        /// Description of the playback failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation is not valid in the session's current state.
    #[error("Cannot {operation} while {state} {location}")]
    InvalidState {
        /// The rejected operation.
        operation: &'static str,
        /// Name of the state the session was in.
        state: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Description without the source location, for showing to the user.
    pub fn reason(&self) -> String {
        match self {
            Self::HardwareUnavailable { reason, .. }
            | Self::CaptureFinalizeFailed { reason, .. }
            | Self::PlaybackFailed { reason, .. } => reason.clone(),
            Self::InvalidState {
                operation, state, ..
            } => format!("Cannot {} while {}", operation, state),
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
