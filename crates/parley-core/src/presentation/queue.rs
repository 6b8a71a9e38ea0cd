use crate::presentation::{
    Alert, AlertView, DEFAULT_TOAST_DURATION, Phase, Toast,
    slot::{Slot, SlotKind, SlotTimings, TimerEvent},
};

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Animation and deadline lengths for both slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationTimings {
    /// Alert fade/scale-in.
    pub alert_enter: Duration,
    /// Alert fade-out.
    pub alert_exit: Duration,
    /// Toast fade-in.
    pub toast_enter: Duration,
    /// Toast fade-out.
    pub toast_exit: Duration,
    /// Time a toast stays up before dismissing itself.
    pub toast_duration: Duration,
}

impl Default for PresentationTimings {
    fn default() -> Self {
        Self {
            alert_enter: Duration::from_millis(200),
            alert_exit: Duration::from_millis(200),
            toast_enter: Duration::from_millis(300),
            toast_exit: Duration::from_millis(300),
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

/// Requests accepted from producers (screens, sessions, the app loop).
#[derive(Debug)]
pub enum PresentationRequest {
    /// Show an alert, replacing any current one.
    Alert(Alert),
    /// Show a toast, replacing any current one.
    Toast(Toast),
    /// The user tapped alert button `index`.
    TapButton(usize),
    /// The user tapped outside the alert.
    TapBackdrop,
    /// Dismiss the toast early.
    DismissToast,
}

/// What the renderer should currently draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationSnapshot {
    /// Alert content, present until its exit animation completes.
    pub alert: Option<AlertView>,
    /// Alert phase.
    pub alert_phase: Phase,
    /// Toast content, present until its exit animation completes.
    pub toast: Option<Toast>,
    /// Toast phase.
    pub toast_phase: Phase,
}

impl PresentationSnapshot {
    /// True while an alert is requested and on screen.
    pub fn is_alert_requested(&self) -> bool {
        self.alert.is_some()
    }

    /// True while a toast is requested and on screen.
    pub fn is_toast_requested(&self) -> bool {
        self.toast.is_some()
    }
}

/// Producer-side handle to the presentation queue.
///
/// Cheap to clone. Sends never block; if the queue has shut down the request
/// is dropped.
#[derive(Debug, Clone)]
pub struct PresentationHandle {
    requests: mpsc::UnboundedSender<PresentationRequest>,
    snapshot: watch::Receiver<PresentationSnapshot>,
}

impl PresentationHandle {
    /// Requests an alert.
    pub fn request_alert(&self, alert: Alert) {
        self.send(PresentationRequest::Alert(alert));
    }

    /// Requests a toast.
    pub fn request_toast(&self, toast: Toast) {
        self.send(PresentationRequest::Toast(toast));
    }

    /// Reports a tap on alert button `index`.
    pub fn tap_button(&self, index: usize) {
        self.send(PresentationRequest::TapButton(index));
    }

    /// Reports a tap on the alert backdrop.
    pub fn tap_backdrop(&self) {
        self.send(PresentationRequest::TapBackdrop);
    }

    /// Dismisses the current toast early.
    pub fn dismiss_toast(&self) {
        self.send(PresentationRequest::DismissToast);
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> PresentationSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Whether an alert is currently requested.
    pub fn is_alert_requested(&self) -> bool {
        self.snapshot.borrow().is_alert_requested()
    }

    /// Whether a toast is currently requested.
    pub fn is_toast_requested(&self) -> bool {
        self.snapshot.borrow().is_toast_requested()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<PresentationSnapshot> {
        self.snapshot.clone()
    }

    fn send(&self, request: PresentationRequest) {
        if self.requests.send(request).is_err() {
            debug!("Presentation queue stopped, request dropped");
        }
    }
}

/// Owns the alert slot and the toast slot.
///
/// Runs as a single task: producer requests and timer callbacks arrive on
/// channels and are applied one at a time, so slot transitions never
/// interleave.
pub struct PresentationQueue {
    alert: Slot<Alert>,
    toast: Slot<Toast>,
    requests: mpsc::UnboundedReceiver<PresentationRequest>,
    timers: mpsc::UnboundedReceiver<TimerEvent>,
    snapshot: watch::Sender<PresentationSnapshot>,
}

impl PresentationQueue {
    /// Creates the queue and its producer handle.
    pub fn new(timings: PresentationTimings) -> (Self, PresentationHandle) {
        let (request_tx, requests) = mpsc::unbounded_channel();
        let (timer_tx, timers) = mpsc::unbounded_channel();
        let (snapshot, snapshot_rx) = watch::channel(PresentationSnapshot::default());

        let alert = Slot::new(
            SlotKind::Alert,
            SlotTimings {
                enter: timings.alert_enter,
                exit: timings.alert_exit,
                deadline: None,
            },
            timer_tx.clone(),
        );
        let toast = Slot::new(
            SlotKind::Toast,
            SlotTimings {
                enter: timings.toast_enter,
                exit: timings.toast_exit,
                deadline: Some(timings.toast_duration),
            },
            timer_tx,
        );

        let queue = Self {
            alert,
            toast,
            requests,
            timers,
            snapshot,
        };
        let handle = PresentationHandle {
            requests: request_tx,
            snapshot: snapshot_rx,
        };

        (queue, handle)
    }

    /// Processes requests and timer callbacks until shutdown or until every
    /// producer handle is dropped.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("Presentation queue started");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!("Presentation queue shutting down");
                    break;
                }
                request = self.requests.recv() => match request {
                    Some(request) => self.apply(request),
                    None => {
                        debug!("All presentation handles dropped");
                        break;
                    }
                },
                Some(event) = self.timers.recv() => self.on_timer(event),
            }
        }

        self.teardown();
        info!("Presentation queue stopped");
    }

    pub(crate) fn apply(&mut self, request: PresentationRequest) {
        match request {
            PresentationRequest::Alert(alert) => {
                debug!(title = alert.title(), "Alert requested");
                self.alert.present(alert.with_default_button());
            }
            PresentationRequest::Toast(toast) => {
                debug!(kind = ?toast.kind, text = %toast.text, "Toast requested");
                self.toast.present(toast);
            }
            PresentationRequest::TapButton(index) => self.tap_button(index),
            PresentationRequest::TapBackdrop => {
                if self.alert.dismiss() {
                    debug!("Alert dismissed from backdrop");
                }
            }
            PresentationRequest::DismissToast => {
                self.toast.dismiss();
            }
        }
        self.publish();
    }

    pub(crate) fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::AnimationFinished { slot, .. } | TimerEvent::DeadlineExpired { slot, .. } => {
                match slot {
                    SlotKind::Alert => self.alert.on_timer(event),
                    SlotKind::Toast => self.toast.on_timer(event),
                }
            }
        }
        self.publish();
    }

    fn tap_button(&mut self, index: usize) {
        if !matches!(self.alert.phase(), Phase::Entering | Phase::Visible) {
            debug!(index, phase = ?self.alert.phase(), "Button tap ignored, no interactive alert");
            return;
        }

        let Some(callback) = self.alert.payload_mut().and_then(|a| a.take_callback(index)) else {
            warn!(index, "Tap on unknown alert button ignored");
            return;
        };

        if let Some(callback) = callback {
            callback();
        }
        self.alert.dismiss();
    }

    fn publish(&self) {
        let next = PresentationSnapshot {
            alert: self.alert.payload().map(Alert::view),
            alert_phase: self.alert.phase(),
            toast: self.toast.payload().cloned(),
            toast_phase: self.toast.phase(),
        };

        self.snapshot.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn teardown(&mut self) {
        self.alert.reset();
        self.toast.reset();
        self.publish();
    }
}

#[cfg(test)]
impl PresentationQueue {
    /// Applies every timer callback that has already fired.
    pub(crate) fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.timers.try_recv() {
            self.on_timer(event);
            applied += 1;
        }
        applied
    }

    pub(crate) fn alert(&self) -> Option<&Alert> {
        self.alert.payload()
    }

    pub(crate) fn alert_phase(&self) -> Phase {
        self.alert.phase()
    }

    pub(crate) fn toast_phase(&self) -> Phase {
        self.toast.phase()
    }

    pub(crate) fn toast(&self) -> Option<&Toast> {
        self.toast.payload()
    }

    pub(crate) fn armed_timers(&self) -> usize {
        self.alert.armed_timers() + self.toast.armed_timers()
    }

    pub(crate) fn toast_deadline_armed(&self) -> bool {
        self.toast.has_deadline()
    }
}
