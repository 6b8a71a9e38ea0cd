//! Terminal rendering of presentation snapshots.
//!
//! Prints a line when an alert or toast appears or is replaced, and when an
//! alert starts leaving. Phases in between are not drawn.

use parley_core::{AlertView, ButtonStyle, Phase, PresentationSnapshot, Toast};
use tokio::sync::watch;
use tracing::{debug, instrument};

/// Lines to print for the move from `prev` to `next`.
pub(crate) fn describe_changes(
    prev: &PresentationSnapshot,
    next: &PresentationSnapshot,
) -> Vec<String> {
    let mut lines = Vec::new();

    let alert_interactive = matches!(next.alert_phase, Phase::Entering | Phase::Visible);
    if let Some(alert) = next
        .alert
        .as_ref()
        .filter(|a| alert_interactive && prev.alert.as_ref() != Some(*a))
    {
        lines.extend(render_alert(alert));
    }

    if next.alert_phase == Phase::Exiting && prev.alert_phase != Phase::Exiting {
        lines.push("[alert closed]".to_string());
    }

    if let Some(toast) = next
        .toast
        .as_ref()
        .filter(|t| next.toast_phase.is_shown() && prev.toast.as_ref() != Some(*t))
    {
        lines.push(render_toast(toast));
    }

    lines
}

fn render_alert(alert: &AlertView) -> Vec<String> {
    let buttons = alert
        .buttons
        .iter()
        .enumerate()
        .map(|(index, button)| {
            let marker = match button.style {
                ButtonStyle::Default => "",
                ButtonStyle::Cancel => " (cancel)",
                ButtonStyle::Destructive => " (!)",
            };
            format!("[{}] {}{}", index, button.label, marker)
        })
        .collect::<Vec<_>>()
        .join("  ");

    vec![
        format!("[alert] {}", alert.title),
        format!("        {}", alert.message),
        format!("        {}", buttons),
    ]
}

fn render_toast(toast: &Toast) -> String {
    match &toast.detail {
        Some(detail) => format!("[{}] {} ({})", toast.kind.label(), toast.text, detail),
        None => format!("[{}] {}", toast.kind.label(), toast.text),
    }
}

/// Prints snapshot changes until shutdown or until the queue goes away.
#[instrument(skip_all)]
pub(crate) async fn run(
    mut snapshots: watch::Receiver<PresentationSnapshot>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut shown = snapshots.borrow_and_update().clone();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = snapshots.borrow_and_update().clone();
                for line in describe_changes(&shown, &next) {
                    println!("{}", line);
                }
                shown = next;
            }
        }
    }

    debug!("Renderer stopped");
}
