use crate::{
    CoreResult, SessionError, TimerHandle,
    audio::{AudioRecorder, CaptureGate, ClipRef},
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use tokio::{
    sync::{OwnedMutexGuard, watch},
    time::Instant,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const DURATION_TICK: Duration = Duration::from_secs(1);

/// Lifecycle of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No recording in progress.
    Idle,
    /// Hardware is capturing and the duration ticks once per second.
    Recording {
        /// When recording started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// Finalization was requested and has not completed.
    Stopping {
        /// Session ID of the recording being finalized.
        session_id: Uuid,
    },
}

impl CaptureState {
    /// Short state name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording { .. } => "recording",
            Self::Stopping { .. } => "stopping",
        }
    }
}

/// A finished recording handed back by [`CaptureSession::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedClip {
    /// Where the recorder left the clip.
    pub clip: ClipRef,
    /// Whole seconds counted while recording.
    pub duration_secs: u32,
}

/// Owns one voice recording at a time.
///
/// Holds the hardware handle, the 1 Hz duration ticker and the exclusive
/// [`CaptureGate`] guard together; they are acquired together on `start` and
/// released together by [`release`](Self::release), which stop, cancel and
/// drop all funnel through.
///
/// Operations take `&mut self`, so a `stop` can only begin after a pending
/// `start` has resolved.
pub struct CaptureSession<R: AudioRecorder> {
    recorder: R,
    gate: CaptureGate,
    state: CaptureState,
    handle: Option<R::Handle>,
    exclusive: Option<OwnedMutexGuard<()>>,
    ticker: Option<TimerHandle>,
    duration: Arc<watch::Sender<u32>>,
}

impl<R: AudioRecorder> CaptureSession<R> {
    /// Creates an idle session that records through `recorder`.
    pub fn new(recorder: R, gate: CaptureGate) -> Self {
        let (duration, _) = watch::channel(0);
        Self {
            recorder,
            gate,
            state: CaptureState::Idle,
            handle: None,
            exclusive: None,
            ticker: None,
            duration: Arc::new(duration),
        }
    }

    /// Acquires the recorder and starts the duration tick.
    ///
    /// A call while already recording or stopping is ignored.
    ///
    /// # Errors
    ///
    /// Returns `HardwareUnavailable` if another session holds the gate or the
    /// platform refuses the device. The session stays idle.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> CoreResult<()> {
        if self.state != CaptureState::Idle {
            warn!(state = self.state.name(), "Capture already active, start ignored");
            return Ok(());
        }

        let exclusive = self
            .gate
            .try_acquire()
            .ok_or_else(|| SessionError::HardwareUnavailable {
                reason: "Another capture session is recording".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let handle = self.recorder.record().await.map_err(|e| match e {
            SessionError::HardwareUnavailable { .. } => e,
            other => SessionError::HardwareUnavailable {
                reason: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        let session_id = Uuid::new_v4();
        self.duration.send_replace(0);
        let duration = Arc::clone(&self.duration);

        self.handle = Some(handle);
        self.exclusive = Some(exclusive);
        self.ticker = Some(TimerHandle::every("capture-duration", DURATION_TICK, move || {
            duration.send_modify(|secs| *secs += 1);
            true
        }));
        self.state = CaptureState::Recording {
            started_at: Instant::now(),
            session_id,
        };

        info!(session_id = %session_id, "Recording started");

        Ok(())
    }

    /// Finalizes the recording and returns the clip with its duration.
    ///
    /// The duration tick and the hardware handle are released before this
    /// returns on every path.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless recording; `CaptureFinalizeFailed` if the
    /// recorder fails or returns an empty reference. No clip is exposed on
    /// failure and the duration is discarded.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<CapturedClip> {
        let (started_at, session_id) = match self.state {
            CaptureState::Recording {
                started_at,
                session_id,
            } => (started_at, session_id),
            other => {
                return Err(SessionError::InvalidState {
                    operation: "stop",
                    state: other.name(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        self.state = CaptureState::Stopping { session_id };
        self.ticker = None;
        let duration_secs = *self.duration.borrow();

        // If this future is dropped mid-await the handle goes with it and
        // the session stays Stopping until cancel or drop.
        let finalized = match self.handle.take() {
            Some(handle) => self.recorder.stop(handle).await,
            None => Err(SessionError::CaptureFinalizeFailed {
                reason: "No recorder handle held".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        };

        self.release();

        match finalized {
            Ok(clip) if !clip.is_empty() => {
                info!(
                    session_id = %session_id,
                    duration_secs,
                    elapsed_ms = started_at.elapsed().as_millis(),
                    clip = %clip,
                    "Recording stopped"
                );
                Ok(CapturedClip {
                    clip,
                    duration_secs,
                })
            }
            Ok(_) => Err(SessionError::CaptureFinalizeFailed {
                reason: "Recorder returned an empty clip reference".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => {
                warn!(session_id = %session_id, error = ?e, "Capture finalization failed");
                Err(SessionError::CaptureFinalizeFailed {
                    reason: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    /// Discards the recording. Always succeeds from the caller's view.
    ///
    /// Recorder failures while stopping are logged and swallowed. Calling it
    /// while idle is a no-op apart from resetting the duration.
    #[instrument(skip(self))]
    pub async fn cancel(&mut self) {
        self.ticker = None;

        if let Some(handle) = self.handle.take() {
            match self.recorder.stop(handle).await {
                Ok(clip) => self.recorder.discard(&clip),
                Err(e) => warn!(error = ?e, "Recorder stop failed during cancel, ignoring"),
            }
        }

        if self.state != CaptureState::Idle {
            info!(state = self.state.name(), "Recording cancelled");
        }

        self.release();
    }

    /// Drops the ticker, handle and gate guard, and returns to idle.
    ///
    /// Synchronous so that teardown can run it from `Drop`.
    pub fn release(&mut self) {
        self.ticker = None;
        self.handle = None;
        self.exclusive = None;
        self.state = CaptureState::Idle;
        self.duration.send_replace(0);
    }

    /// Current state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Seconds counted so far in the current recording.
    pub fn duration_secs(&self) -> u32 {
        *self.duration.borrow()
    }

    /// Subscribes to duration updates.
    pub fn subscribe_duration(&self) -> watch::Receiver<u32> {
        self.duration.subscribe()
    }

    /// True while the duration ticker is armed.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Number of hardware handles held (0 or 1).
    pub fn held_handles(&self) -> usize {
        usize::from(self.handle.is_some())
    }
}

impl<R: AudioRecorder> Drop for CaptureSession<R> {
    fn drop(&mut self) {
        if self.state != CaptureState::Idle {
            debug!(state = self.state.name(), "Capture session torn down while active");
        }
        self.release();
    }
}
