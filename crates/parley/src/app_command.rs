use parley_core::LogLevel;

/// Commands sent from the input forwarder to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Start recording a voice message.
    StartRecording,
    /// Stop the recording and send it.
    SendRecording,
    /// Stop the recording and discard it.
    CancelRecording,
    /// Play or pause the last sent voice message.
    TogglePlayback,
    /// Advance the playback speed.
    CycleRate,
    /// Print the recent logs, optionally only one level.
    ShowLogs {
        /// Level filter (None = all levels).
        level: Option<LogLevel>,
    },
    /// Copy the recent logs to the clipboard.
    CopyLogs {
        /// Level filter (None = all levels).
        level: Option<LogLevel>,
    },
    /// Empty the log ring.
    ClearLogs,
    /// Tap a button on the visible alert.
    TapAlertButton {
        /// Button position, starting at 0.
        index: usize,
    },
    /// Tap outside the visible alert.
    TapBackdrop,
    /// Request application shutdown.
    Shutdown,
}
