//! Copying exported diagnostic logs to the system clipboard.

use crate::{AppError, AppResult};

use std::panic::Location;

use arboard::Clipboard;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// Destination for exported log text.
pub(crate) trait TextSink {
    /// Replaces the sink's contents with `text`.
    fn set_text(&mut self, text: &str) -> AppResult<()>;
}

/// System clipboard, opened on first use.
///
/// Opening lazily lets the app run on machines without a clipboard; only
/// the copy itself fails there.
#[derive(Default)]
pub(crate) struct ClipboardExporter {
    clipboard: Option<Clipboard>,
}

impl ClipboardExporter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[track_caller]
    fn clipboard(&mut self) -> AppResult<&mut Clipboard> {
        if self.clipboard.is_none() {
            let clipboard = Clipboard::new().map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to initialize clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            debug!("Clipboard opened");
            self.clipboard = Some(clipboard);
        }

        self.clipboard.as_mut().ok_or_else(|| AppError::ClipboardError {
            reason: "Clipboard unavailable".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl TextSink for ClipboardExporter {
    #[instrument(skip(self, text))]
    fn set_text(&mut self, text: &str) -> AppResult<()> {
        let result = self
            .clipboard()?
            .set_text(text)
            .map_err(|e| AppError::ClipboardError {
                reason: format!("Failed to set clipboard: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });

        match &result {
            Ok(()) => info!(text_len = text.len(), "Logs copied to clipboard"),
            Err(e) => {
                warn!(error = ?e, "Clipboard write failed, reopening on next copy");
                self.clipboard = None;
            }
        }

        result
    }
}
