use serde::{Deserialize, Serialize};

use std::path::PathBuf;

/// Audio device and clip storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Selected input device name (None = default device).
    #[serde(default)]
    pub selected_device: Option<String>,
    /// Where recorded clips are written (None = `<data dir>/clips`).
    #[serde(default)]
    pub clip_dir: Option<PathBuf>,
}
