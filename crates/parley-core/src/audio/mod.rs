mod capture;
mod gate;
mod hardware;
mod playback;
mod time_label;

pub use {
    capture::{CaptureSession, CaptureState, CapturedClip},
    gate::CaptureGate,
    hardware::{AudioOutput, AudioPlayer, AudioRecorder, ClipRef},
    playback::{
        DEFAULT_PLAYBACK_RATES, DEFAULT_POLL_INTERVAL, PlaybackSession, PlaybackSettings,
        PlaybackState,
    },
    time_label::{format_clock, progress_fraction},
};
