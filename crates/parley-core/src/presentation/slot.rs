//! Single-slot presentation state machine shared by the alert and the toast.
//!
//! A slot holds at most one payload. Every timer it arms carries the epoch
//! it was armed under; callbacks whose epoch no longer matches are dropped,
//! so a superseded animation or deadline can never act on a newer payload.

use crate::TimerHandle;

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

/// Visibility phase of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing shown.
    #[default]
    NotVisible,
    /// Entry animation running.
    Entering,
    /// Fully shown.
    Visible,
    /// Exit animation running.
    Exiting,
}

impl Phase {
    /// True while the payload is on screen in any form.
    pub fn is_shown(&self) -> bool {
        !matches!(self, Self::NotVisible)
    }
}

/// Which slot a timer event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// The modal alert.
    Alert,
    /// The toast banner.
    Toast,
}

/// Timer callbacks posted back to the owning queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerEvent {
    AnimationFinished { slot: SlotKind, epoch: u64 },
    DeadlineExpired { slot: SlotKind, epoch: u64 },
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotTimings {
    pub(crate) enter: Duration,
    pub(crate) exit: Duration,
    /// Auto-dismiss delay, armed on every `present`.
    pub(crate) deadline: Option<Duration>,
}

pub(crate) struct Slot<T> {
    kind: SlotKind,
    timings: SlotTimings,
    payload: Option<T>,
    phase: Phase,
    animation_epoch: u64,
    deadline_epoch: u64,
    animation: Option<TimerHandle>,
    deadline: Option<TimerHandle>,
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl<T> Slot<T> {
    pub(crate) fn new(
        kind: SlotKind,
        timings: SlotTimings,
        events: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        Self {
            kind,
            timings,
            payload: None,
            phase: Phase::NotVisible,
            animation_epoch: 0,
            deadline_epoch: 0,
            animation: None,
            deadline: None,
            events,
        }
    }

    /// Shows `payload`, replacing whatever the slot held.
    ///
    /// Entering or visible: swap in place, no animation replay. Exiting: the
    /// exit animation is superseded by a fresh entry. The deadline, if any,
    /// is re-armed in every case.
    pub(crate) fn present(&mut self, payload: T) {
        self.payload = Some(payload);

        match self.phase {
            Phase::NotVisible | Phase::Exiting => {
                self.animate(Phase::Entering, self.timings.enter);
            }
            Phase::Entering | Phase::Visible => {
                debug!(slot = ?self.kind, phase = ?self.phase, "Payload superseded in place");
            }
        }

        self.arm_deadline();
    }

    /// Starts the exit animation. Returns `false` if already leaving or gone.
    pub(crate) fn dismiss(&mut self) -> bool {
        match self.phase {
            Phase::Entering | Phase::Visible => {
                self.disarm_deadline();
                self.animate(Phase::Exiting, self.timings.exit);
                true
            }
            Phase::NotVisible | Phase::Exiting => false,
        }
    }

    pub(crate) fn on_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::AnimationFinished { epoch, .. } => self.finish_animation(epoch),
            TimerEvent::DeadlineExpired { epoch, .. } => self.expire(epoch),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub(crate) fn payload_mut(&mut self) -> Option<&mut T> {
        self.payload.as_mut()
    }

    /// Armed timers, at most one animation and one deadline.
    #[cfg(test)]
    pub(crate) fn armed_timers(&self) -> usize {
        usize::from(self.animation.is_some()) + usize::from(self.deadline.is_some())
    }

    #[cfg(test)]
    pub(crate) fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drops every timer and the payload without animating.
    pub(crate) fn reset(&mut self) {
        self.animation = None;
        self.deadline = None;
        self.animation_epoch += 1;
        self.deadline_epoch += 1;
        self.payload = None;
        self.phase = Phase::NotVisible;
    }

    fn animate(&mut self, phase: Phase, duration: Duration) {
        self.phase = phase;
        self.animation_epoch += 1;

        let epoch = self.animation_epoch;
        let slot = self.kind;
        let events = self.events.clone();

        // Replacing the handle aborts the superseded animation.
        self.animation = Some(TimerHandle::after(
            "presentation-animation",
            duration,
            move || {
                let _ = events.send(TimerEvent::AnimationFinished { slot, epoch });
            },
        ));
    }

    fn arm_deadline(&mut self) {
        let Some(delay) = self.timings.deadline else {
            return;
        };

        self.deadline_epoch += 1;

        let epoch = self.deadline_epoch;
        let slot = self.kind;
        let events = self.events.clone();

        self.deadline = Some(TimerHandle::after(
            "presentation-deadline",
            delay,
            move || {
                let _ = events.send(TimerEvent::DeadlineExpired { slot, epoch });
            },
        ));
    }

    fn disarm_deadline(&mut self) {
        self.deadline_epoch += 1;
        self.deadline = None;
    }

    fn finish_animation(&mut self, epoch: u64) {
        if epoch != self.animation_epoch {
            debug!(slot = ?self.kind, epoch, current = self.animation_epoch, "Stale animation callback ignored");
            return;
        }

        self.animation = None;

        match self.phase {
            Phase::Entering => self.phase = Phase::Visible,
            Phase::Exiting => {
                self.phase = Phase::NotVisible;
                self.payload = None;
            }
            Phase::NotVisible | Phase::Visible => {}
        }
    }

    fn expire(&mut self, epoch: u64) {
        if epoch != self.deadline_epoch || self.deadline.is_none() {
            debug!(slot = ?self.kind, epoch, current = self.deadline_epoch, "Stale deadline ignored");
            return;
        }

        self.deadline = None;
        self.dismiss();
    }
}
