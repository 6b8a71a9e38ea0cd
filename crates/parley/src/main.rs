//! Parley: voice messages, transient alerts and diagnostic logs in the
//! terminal.

mod app;
mod app_command;
mod config;
mod device;
mod error;
mod input;
mod log_export;
mod renderer;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    log_export::{ClipboardExporter, TextSink},
};

use crate::{
    config::Config,
    device::{CpalOutput, CpalRecorder},
};

use parley_core::{
    CaptureGate, CaptureSession, DiagnosticLog, LogRingSettings, PlaybackSettings,
    PresentationQueue, PresentationTimings,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "parley=debug,parley_core=debug,warn";

/// Application entry point.
#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let diagnostics = DiagnosticLog::new(LogRingSettings::from(&config.diagnostics));
    diagnostics.init(DEFAULT_LOG_FILTER);

    let clip_dir = match config.clip_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Failed to resolve clip directory: {:?}", e);
            std::process::exit(1);
        }
    };

    let (queue, presenter) = PresentationQueue::new(PresentationTimings::from(&config.presentation));
    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let queue_task = tokio::spawn(queue.run(shutdown_rx.clone()));
    let renderer_task = tokio::spawn(renderer::run(presenter.subscribe(), shutdown_rx));

    if let Err(e) = input::spawn_stdin_forwarder(command_tx.clone()) {
        error!("Failed to start input forwarder: {:?}", e);
        std::process::exit(1);
    }

    println!("{}", input::HELP);

    let app = App {
        capture: CaptureSession::new(
            CpalRecorder::new(clip_dir, config.audio.selected_device.clone()),
            CaptureGate::new(),
        ),
        output: CpalOutput,
        playback: None,
        playback_settings: PlaybackSettings::from(&config.playback),
        presenter,
        diagnostics,
        exporter: ClipboardExporter::new(),
        command_tx,
        command_rx,
        shutdown_tx,
    };

    if let Err(e) = app.run().await {
        error!(error = ?e, "App error");
    }

    if let Err(e) = queue_task.await {
        error!(error = ?e, "Presentation task panicked");
    }
    if let Err(e) = renderer_task.await {
        error!(error = ?e, "Renderer task panicked");
    }

    info!("Goodbye");
}
