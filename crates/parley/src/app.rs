use crate::{AppCommand, AppError, AppResult, TextSink};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;

use parley_core::{
    Alert, AlertButton, AudioOutput, AudioRecorder, CaptureSession, CaptureState, CapturedClip,
    DiagnosticLog, LogEntry, LogLevel, PlaybackSession, PlaybackSettings, PresentationHandle, SessionError,
    Toast, format_clock,
};
use tokio::{
    sync::{mpsc, watch},
    time::MissedTickBehavior,
};
use tracing::{debug, error, info, instrument, warn};

/// How often the playback session is reconciled with its player.
const PLAYBACK_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Main application state.
///
/// Owns the capture session and at most one playback session (the last sent
/// voice message). Commands arrive on `command_rx` and are handled one at a
/// time; alerts and toasts go out through `presenter`.
pub struct App<R: AudioRecorder, O: AudioOutput, S: TextSink> {
    pub(crate) capture: CaptureSession<R>,
    pub(crate) output: O,
    pub(crate) playback: Option<PlaybackSession<O::Player>>,
    pub(crate) playback_settings: PlaybackSettings,
    pub(crate) presenter: PresentationHandle,
    pub(crate) diagnostics: DiagnosticLog,
    pub(crate) exporter: S,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<R: AudioRecorder, O: AudioOutput, S: TextSink> App<R, O, S> {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Parley starting");

        let mut duration_rx = self.capture.subscribe_duration();
        let mut refresh = tokio::time::interval(PLAYBACK_REFRESH_INTERVAL);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(AppCommand::Shutdown) => {
                        info!("Shutdown requested");
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd).await,
                    None => {
                        info!("All command senders closed, shutting down");
                        break;
                    }
                },

                Ok(()) = duration_rx.changed() => {
                    let secs = *duration_rx.borrow_and_update();
                    if secs > 0 {
                        println!("recording {}", format_clock(f64::from(secs)));
                    }
                }

                _ = refresh.tick() => self.refresh_playback(),
            }
        }

        self.teardown().await;
        info!("Parley shut down successfully");

        Ok(())
    }

    /// Applies one command.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::StartRecording => self.start_recording().await,
            AppCommand::SendRecording => self.send_recording().await,
            AppCommand::CancelRecording => self.cancel_recording().await,
            AppCommand::TogglePlayback => self.toggle_playback().await,
            AppCommand::CycleRate => self.cycle_rate(),
            AppCommand::ShowLogs { level } => self.show_logs(level),
            AppCommand::CopyLogs { level } => self.copy_logs(level),
            AppCommand::ClearLogs => {
                self.diagnostics.clear();
                self.presenter.request_toast(Toast::info("Logs cleared"));
            }
            AppCommand::TapAlertButton { index } => self.presenter.tap_button(index),
            AppCommand::TapBackdrop => self.presenter.tap_backdrop(),
            AppCommand::Shutdown => debug!("Shutdown is handled by the run loop"),
        }
    }

    async fn start_recording(&mut self) {
        match self.capture.start().await {
            Ok(()) => {
                if let CaptureState::Recording { session_id, .. } = self.capture.state() {
                    println!("recording 0:00 (send | cancel)");
                    debug!(session_id = %session_id, "Recording in progress");
                }
            }
            Err(e) => {
                error!(error = ?e, "Failed to start recording");
                let alert = self.retry_alert("Microphone unavailable", &e);
                self.presenter.request_alert(alert);
            }
        }
    }

    async fn send_recording(&mut self) {
        match self.capture.stop().await {
            Ok(captured) => {
                info!(clip = %captured.clip, duration_secs = captured.duration_secs, "Voice message sent");
                self.presenter.request_toast(
                    Toast::success("Voice message sent")
                        .with_detail(format_clock(f64::from(captured.duration_secs))),
                );
                self.open_playback(captured).await;
            }
            Err(SessionError::InvalidState { .. }) => {
                self.presenter.request_toast(Toast::info("Nothing to send"));
            }
            Err(e) => {
                error!(error = ?e, "Failed to finish recording");
                let alert = self.retry_alert("Recording failed", &e);
                self.presenter.request_alert(alert);
            }
        }
    }

    async fn cancel_recording(&mut self) {
        let was_active = self.capture.state() != CaptureState::Idle;
        self.capture.cancel().await;
        if was_active {
            self.presenter.request_toast(Toast::info("Recording discarded"));
        }
    }

    async fn open_playback(&mut self, captured: CapturedClip) {
        if let Some(mut previous) = self.playback.take() {
            previous.close().await;
        }

        match self.output.open(&captured.clip).await {
            Ok(player) => {
                self.playback = Some(PlaybackSession::new(
                    player,
                    captured.clip,
                    f64::from(captured.duration_secs),
                    self.playback_settings.clone(),
                ));
                println!(
                    "voice message {} (play | rate)",
                    format_clock(f64::from(captured.duration_secs))
                );
            }
            Err(e) => {
                warn!(error = ?e, "Failed to open player for sent clip");
                self.presenter
                    .request_toast(Toast::error("Playback unavailable").with_detail(e.reason()));
            }
        }
    }

    async fn toggle_playback(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            self.presenter
                .request_toast(Toast::info("No voice message to play"));
            return;
        };

        match playback.toggle().await {
            Ok(()) => println!(
                "{:?} {} / {} ({:.0}%)",
                playback.state(),
                format_clock(playback.position_secs()),
                format_clock(playback.total_secs()),
                playback.progress() * 100.0
            ),
            Err(e) => {
                self.presenter
                    .request_toast(Toast::error("Playback failed").with_detail(e.reason()));
            }
        }
    }

    fn cycle_rate(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            self.presenter
                .request_toast(Toast::info("No voice message to play"));
            return;
        };

        match playback.cycle_rate() {
            Ok(rate) => println!("speed {}x", rate),
            Err(e) => {
                self.presenter
                    .request_toast(Toast::error("Speed change failed").with_detail(e.reason()));
            }
        }
    }

    fn refresh_playback(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        if playback.refresh() {
            println!("finished {}", format_clock(playback.total_secs()));
        }
    }

    fn show_logs(&self, level: Option<LogLevel>) {
        let entries = self.diagnostics.recent_logs_at_level(level);
        if entries.is_empty() {
            println!("(no recent logs)");
            return;
        }
        for entry in entries.iter().rev() {
            println!("{}", entry.export_line());
        }
    }

    fn copy_logs(&mut self, level: Option<LogLevel>) {
        let entries = self.diagnostics.recent_logs_at_level(level);
        if entries.is_empty() {
            self.presenter.request_toast(Toast::info("No logs to copy"));
            return;
        }

        let count = match entries.len() {
            1 => "1 log entry".to_string(),
            n => format!("{} log entries", n),
        };
        let text = entries
            .iter()
            .map(LogEntry::export_line)
            .collect::<Vec<_>>()
            .join("\n");
        match self.exporter.set_text(&text) {
            Ok(()) => self
                .presenter
                .request_toast(Toast::success("Copied").with_detail(count)),
            Err(e) => {
                error!(error = ?e, "Failed to copy logs");
                self.presenter
                    .request_toast(Toast::error("Copy failed").with_detail("Clipboard unavailable"));
            }
        }
    }

    /// Alert for a capture failure with a button that starts a new recording.
    fn retry_alert(&self, title: &str, error: &SessionError) -> Alert {
        let command_tx = self.command_tx.clone();
        Alert::new(title, error.reason())
            .with_button(AlertButton::cancel("Dismiss"))
            .with_button(AlertButton::new("Try again").on_press(move || {
                if let Err(e) = queue_command(&command_tx, AppCommand::StartRecording) {
                    warn!(error = %e, "Retry dropped");
                }
            }))
    }

    /// Releases every session through the same path as cancel, then stops
    /// the presentation and rendering tasks.
    async fn teardown(&mut self) {
        self.capture.cancel().await;
        if let Some(mut playback) = self.playback.take() {
            playback.close().await;
        }
        let _ = self.shutdown_tx.send(true);
        debug!("Sessions released");
    }
}

/// Queues a command from a non-async context such as a button callback.
///
/// # Errors
///
/// `ChannelSendFailed` if the channel is full or the app loop has stopped.
#[track_caller]
pub(crate) fn queue_command(
    command_tx: &mpsc::Sender<AppCommand>,
    command: AppCommand,
) -> AppResult<()> {
    command_tx
        .try_send(command)
        .map_err(|e| AppError::ChannelSendFailed {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
