use crate::config::{default_alert_fade_ms, default_toast_duration_ms, default_toast_fade_ms};

use std::time::Duration;

use parley_core::PresentationTimings;
use serde::{Deserialize, Serialize};

/// Alert and toast timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// How long a toast stays up before dismissing itself.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
    /// Alert fade in and out.
    #[serde(default = "default_alert_fade_ms")]
    pub alert_fade_ms: u64,
    /// Toast fade in and out.
    #[serde(default = "default_toast_fade_ms")]
    pub toast_fade_ms: u64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: default_toast_duration_ms(),
            alert_fade_ms: default_alert_fade_ms(),
            toast_fade_ms: default_toast_fade_ms(),
        }
    }
}

impl From<&PresentationConfig> for PresentationTimings {
    fn from(config: &PresentationConfig) -> Self {
        let alert_fade = Duration::from_millis(config.alert_fade_ms);
        let toast_fade = Duration::from_millis(config.toast_fade_ms);
        Self {
            alert_enter: alert_fade,
            alert_exit: alert_fade,
            toast_enter: toast_fade,
            toast_exit: toast_fade,
            toast_duration: Duration::from_millis(config.toast_duration_ms),
        }
    }
}
