mod audio_config;
#[allow(clippy::module_inception)]
mod config;
mod diagnostics_config;
mod playback_config;
mod presentation_config;

use std::time::Duration;

use parley_core::{
    DEFAULT_LOG_CAPACITY, DEFAULT_LOG_WINDOW, DEFAULT_PLAYBACK_RATES, DEFAULT_TOAST_DURATION,
    PlaybackSettings, PresentationTimings,
};

pub(crate) use {
    audio_config::AudioConfig, config::Config, diagnostics_config::DiagnosticsConfig,
    playback_config::PlaybackConfig, presentation_config::PresentationConfig,
};

// Defaults come from the core's settings so the two cannot drift apart.

pub(crate) fn default_poll_interval_ms() -> u64 {
    millis(PlaybackSettings::default().poll_interval)
}

pub(crate) fn default_rates() -> Vec<f32> {
    DEFAULT_PLAYBACK_RATES.to_vec()
}

pub(crate) fn default_toast_duration_ms() -> u64 {
    millis(DEFAULT_TOAST_DURATION)
}

pub(crate) fn default_alert_fade_ms() -> u64 {
    millis(PresentationTimings::default().alert_enter)
}

pub(crate) fn default_toast_fade_ms() -> u64 {
    millis(PresentationTimings::default().toast_enter)
}

pub(crate) fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

pub(crate) fn default_log_window_minutes() -> u64 {
    DEFAULT_LOG_WINDOW.as_secs() / 60
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
