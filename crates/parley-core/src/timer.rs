//! Cancellable timer tasks owned by the session that armed them.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::trace;

/// Owned handle to a spawned one-shot or periodic timer.
///
/// Dropping the handle cancels the timer. The `cancelled` flag is raised
/// before the task is aborted so a callback racing the abort observes it
/// and returns without touching session state.
#[derive(Debug)]
pub struct TimerHandle {
    label: &'static str,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// Shortest period accepted by [`TimerHandle::every`].
pub const MIN_TIMER_PERIOD: Duration = Duration::from_millis(1);

impl TimerHandle {
    /// Runs `tick` every `period`, first firing one period from now.
    ///
    /// The timer stops on its own when `tick` returns `false`. Periods
    /// shorter than [`MIN_TIMER_PERIOD`] are raised to it.
    pub fn every<F>(label: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = period.max(MIN_TIMER_PERIOD);
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if flag.load(Ordering::Acquire) || !tick() {
                    break;
                }
            }
        });

        trace!(timer = label, period_ms = period.as_millis(), "Periodic timer armed");

        Self {
            label,
            cancelled,
            task,
        }
    }

    /// Runs `fire` once after `delay`.
    pub fn after<F>(label: &'static str, delay: Duration, fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            if !flag.load(Ordering::Acquire) {
                fire();
            }
        });

        trace!(timer = label, delay_ms = delay.as_millis(), "One-shot timer armed");

        Self {
            label,
            cancelled,
            task,
        }
    }

    /// True once the task has run to completion or been aborted.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the timer. Equivalent to dropping the handle.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
        trace!(timer = self.label, "Timer cancelled");
    }
}
