use crate::config::{default_log_capacity, default_log_window_minutes};

use std::time::Duration;

use parley_core::LogRingSettings;
use serde::{Deserialize, Serialize};

/// Diagnostic log ring bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Entries retained before the oldest is evicted.
    #[serde(default = "default_log_capacity")]
    pub capacity: usize,
    /// Trailing window shown and exported, in minutes.
    #[serde(default = "default_log_window_minutes")]
    pub window_minutes: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            capacity: default_log_capacity(),
            window_minutes: default_log_window_minutes(),
        }
    }
}

impl From<&DiagnosticsConfig> for LogRingSettings {
    fn from(config: &DiagnosticsConfig) -> Self {
        Self {
            capacity: config.capacity,
            window: Duration::from_secs(config.window_minutes.saturating_mul(60)),
        }
    }
}
