use crate::config::{default_poll_interval_ms, default_rates};

use std::time::Duration;

use parley_core::PlaybackSettings;
use serde::{Deserialize, Serialize};

/// Voice message playback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Position sampling interval while playing.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Rates cycled by the speed control, in order.
    #[serde(default = "default_rates")]
    pub rates: Vec<f32>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            rates: default_rates(),
        }
    }
}

impl From<&PlaybackConfig> for PlaybackSettings {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            rates: config.rates.clone(),
        }
    }
}
