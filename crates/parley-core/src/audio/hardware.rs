//! Platform audio capability consumed by the capture and playback sessions.
//!
//! Every operation is treated as potentially slow and potentially failing.
//! Implementations live outside the core (the `parley` binary ships cpal
//! backends; tests ship scripted fakes).

use crate::CoreResult;

use std::{fmt, future::Future};

/// Reference to a finalized clip, typically a file path or URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipRef(String);

impl ClipRef {
    /// Wraps a clip location.
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// The clip location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the recorder handed back no usable location.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ClipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hardware recording primitive.
///
/// `record` acquires the device and returns a handle that owns it. Dropping
/// a handle without calling `stop` must still release the device; the
/// capture session relies on this during teardown.
pub trait AudioRecorder: Send + Sync {
    /// Live recording owned by the session until stop or cancel.
    type Handle: Send + 'static;

    /// Acquires the input device and starts capturing.
    fn record(&self) -> impl Future<Output = CoreResult<Self::Handle>> + Send;

    /// Finalizes the capture and returns a reference to the clip.
    fn stop(&self, handle: Self::Handle) -> impl Future<Output = CoreResult<ClipRef>> + Send;

    /// Deletes a clip produced by a cancelled recording. Best effort.
    fn discard(&self, _clip: &ClipRef) {}
}

/// Hardware playback primitive for a single clip.
///
/// Shared between the session and its position poller, hence `&self`
/// everywhere and the `Sync` bound.
pub trait AudioPlayer: Send + Sync + 'static {
    /// Starts or resumes playback.
    fn play(&self) -> impl Future<Output = CoreResult<()>> + Send;

    /// Pauses playback, keeping the position.
    fn pause(&self) -> impl Future<Output = CoreResult<()>> + Send;

    /// Current playback position in seconds.
    fn current_position(&self) -> f64;

    /// Whether the player is producing audio right now. Turns `false` on
    /// its own when the clip ends.
    fn is_playing(&self) -> bool;

    /// Applies a new playback rate immediately, including mid-playback.
    fn set_playback_rate(&self, rate: f32) -> CoreResult<()>;
}

/// Opens a player for a clip. One player per rendered voice message.
pub trait AudioOutput {
    /// Player type produced for each clip.
    type Player: AudioPlayer;

    /// Loads `clip` and returns a paused player positioned at zero.
    fn open(&self, clip: &ClipRef) -> impl Future<Output = CoreResult<Self::Player>> + Send;
}

impl<T: AudioRecorder> AudioRecorder for std::sync::Arc<T> {
    type Handle = T::Handle;

    fn record(&self) -> impl Future<Output = CoreResult<Self::Handle>> + Send {
        (**self).record()
    }

    fn stop(&self, handle: Self::Handle) -> impl Future<Output = CoreResult<ClipRef>> + Send {
        (**self).stop(handle)
    }

    fn discard(&self, clip: &ClipRef) {
        (**self).discard(clip)
    }
}

