//! Parley Core Library
//!
//! Resource-lifecycle engines behind the Parley messaging client: voice
//! message capture and playback sessions, the single-slot alert/toast
//! presentation queue, and the bounded, time-windowed diagnostic log ring.
//!
//! Hardware is consumed through the [`AudioRecorder`], [`AudioPlayer`] and
//! [`AudioOutput`] traits; the core ships no platform backend.
//!
//! # Example
//!
//! ```no_run
//! use parley_core::{AudioRecorder, CaptureGate, CaptureSession, CoreResult};
//!
//! use std::time::Duration;
//!
//! async fn record_voice_message<R: AudioRecorder>(recorder: R) -> CoreResult<()> {
//!     let mut session = CaptureSession::new(recorder, CaptureGate::new());
//!
//!     session.start().await?;
//!     tokio::time::sleep(Duration::from_secs(3)).await;
//!     let captured = session.stop().await?;
//!
//!     println!("Recorded {} ({}s)", captured.clip, captured.duration_secs);
//!     Ok(())
//! }
//! ```

mod audio;
mod diagnostics;
mod error;
mod presentation;
mod timer;

pub use {
    audio::{
        AudioOutput, AudioPlayer, AudioRecorder, CaptureGate, CaptureSession, CaptureState,
        CapturedClip, ClipRef, DEFAULT_PLAYBACK_RATES, DEFAULT_POLL_INTERVAL, PlaybackSession,
        PlaybackSettings, PlaybackState, format_clock, progress_fraction,
    },
    diagnostics::{
        Clock, DEFAULT_LOG_CAPACITY, DEFAULT_LOG_WINDOW, DiagnosticLog, LogArg, LogEntry,
        LogLevel, LogRing, LogRingSettings, ManualClock, OPAQUE_PLACEHOLDER, RingLayer,
        SystemClock, flatten_args,
    },
    error::{Result as CoreResult, SessionError},
    presentation::{
        Alert, AlertButton, AlertView, ButtonCallback, ButtonStyle, ButtonView,
        DEFAULT_TOAST_DURATION, Phase, PresentationHandle, PresentationQueue,
        PresentationRequest, PresentationSnapshot, PresentationTimings, SlotKind, Toast,
        ToastKind,
    },
    timer::{MIN_TIMER_PERIOD, TimerHandle},
};

#[cfg(test)]
mod tests;
