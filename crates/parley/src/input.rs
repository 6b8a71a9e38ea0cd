//! Line-oriented command input.
//!
//! Each line on stdin is one command. The reader runs on a dedicated thread
//! because stdin has no cancellable read; it forwards parsed commands into
//! the app's channel and exits when the channel closes or input ends.

use crate::{AppCommand, AppResult};

use std::io::BufRead;

use parley_core::LogLevel;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Help text printed for `help` and unknown commands.
pub(crate) const HELP: &str = "\
commands:
  record            start a voice message
  send              stop and send it
  cancel            stop and discard it
  play              play or pause the last message
  rate              cycle playback speed
  logs [level]      show recent logs (all|info|warn|error)
  copy [level]      copy recent logs to the clipboard
  clear             clear logs
  tap <n>           tap alert button n
  backdrop          tap outside the alert
  quit              exit";

/// Parses one input line. `None` for blank, unknown or malformed lines.
pub(crate) fn parse_command(line: &str) -> Option<AppCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let arg = words.next();

    if words.next().is_some() {
        return None;
    }

    let command = match (verb.as_str(), arg) {
        ("record" | "r", None) => AppCommand::StartRecording,
        ("send" | "s", None) => AppCommand::SendRecording,
        ("cancel" | "c", None) => AppCommand::CancelRecording,
        ("play" | "p", None) => AppCommand::TogglePlayback,
        ("rate", None) => AppCommand::CycleRate,
        ("logs" | "l", level) => AppCommand::ShowLogs {
            level: parse_level(level)?,
        },
        ("copy", level) => AppCommand::CopyLogs {
            level: parse_level(level)?,
        },
        ("clear", None) => AppCommand::ClearLogs,
        ("tap" | "t", Some(index)) => AppCommand::TapAlertButton {
            index: index.parse().ok()?,
        },
        ("backdrop" | "b", None) => AppCommand::TapBackdrop,
        ("quit" | "q" | "exit", None) => AppCommand::Shutdown,
        _ => return None,
    };

    Some(command)
}

/// `None` or `all` means no filter; anything else must name a level.
fn parse_level(arg: Option<&str>) -> Option<Option<LogLevel>> {
    match arg {
        None => Some(None),
        Some(word) if word.eq_ignore_ascii_case("all") => Some(None),
        Some(word) => LogLevel::parse(word).map(Some),
    }
}

/// Forwards commands parsed from `reader` until input ends or the receiver
/// is dropped. Sends `Shutdown` at end of input.
///
/// Blocking; call from a thread outside the async runtime.
pub(crate) fn forward_lines<B: BufRead>(reader: B, command_tx: &mpsc::Sender<AppCommand>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read input line");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        if line.trim().eq_ignore_ascii_case("help") {
            println!("{}", HELP);
            continue;
        }

        let Some(command) = parse_command(&line) else {
            println!("unknown command: {}\n{}", line.trim(), HELP);
            continue;
        };

        debug!(command = ?command, "Input command");

        if command_tx.blocking_send(command).is_err() {
            debug!("Command channel closed, input forwarder stopping");
            return;
        }
    }

    info!("Input closed, requesting shutdown");
    let _ = command_tx.blocking_send(AppCommand::Shutdown);
}

/// Spawns the stdin forwarder thread.
///
/// The thread is detached; it ends on its own once the app drops the
/// receiving end and the next line arrives, or at process exit.
pub(crate) fn spawn_stdin_forwarder(command_tx: mpsc::Sender<AppCommand>) -> AppResult<()> {
    let _detached = std::thread::Builder::new()
        .name("stdin-forwarder".to_string())
        .spawn(move || forward_lines(std::io::stdin().lock(), &command_tx))?;

    info!("Input forwarder started");

    Ok(())
}
