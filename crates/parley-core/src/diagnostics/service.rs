use crate::diagnostics::{
    Clock, LogArg, LogEntry, LogLevel, LogRing, LogRingSettings, RingLayer, SystemClock,
    flatten_args,
};

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Diagnostic log service: the ring, its clock and the install guard.
///
/// Constructed once at startup and passed to whatever needs to query logs.
/// Cloning shares the same ring. No method panics or returns an error.
#[derive(Clone)]
pub struct DiagnosticLog {
    inner: Arc<Inner>,
}

struct Inner {
    ring: Mutex<LogRing>,
    clock: Arc<dyn Clock>,
    installed: AtomicBool,
}

impl DiagnosticLog {
    /// Service on the system clock.
    pub fn new(settings: LogRingSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Service on an injected clock.
    pub fn with_clock(settings: LogRingSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                ring: Mutex::new(LogRing::new(settings)),
                clock,
                installed: AtomicBool::new(false),
            }),
        }
    }

    /// Installs the global subscriber: env filter, the ring layer, then the
    /// formatted output layer.
    ///
    /// Only the first successful call on a service does anything. Returns
    /// `true` if this call installed the subscriber; `false` if this service
    /// already did or another global subscriber exists. A failed install
    /// leaves the service uninstalled so a later call may retry.
    pub fn init(&self, default_filter: &str) -> bool {
        if self.inner.installed.swap(true, Ordering::AcqRel) {
            return false;
        }

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(self.layer())
            .with(fmt::layer())
            .try_init();

        match installed {
            Ok(()) => {
                tracing::info!("Diagnostic log ring installed");
                true
            }
            Err(e) => {
                self.inner.installed.store(false, Ordering::Release);
                tracing::warn!(error = %e, "Global subscriber already set, log ring not installed");
                false
            }
        }
    }

    /// Layer recording into this service, for custom subscriber stacks.
    pub fn layer(&self) -> RingLayer {
        RingLayer::new(self.clone())
    }

    /// Flattens `args` and prepends an entry stamped with the current time.
    pub fn record(&self, level: LogLevel, args: &[LogArg]) {
        let entry = LogEntry {
            timestamp: self.inner.clock.now(),
            level,
            message: flatten_args(args),
        };
        self.ring().push(entry);
    }

    /// Records a single message string.
    pub fn record_message(&self, level: LogLevel, message: &str) {
        self.record(level, &[LogArg::from(message)]);
    }

    /// Entries inside the trailing window, most recent first.
    pub fn recent_logs(&self) -> Vec<LogEntry> {
        self.recent_logs_at_level(None)
    }

    /// Windowed entries, optionally restricted to one level.
    pub fn recent_logs_at_level(&self, level: Option<LogLevel>) -> Vec<LogEntry> {
        let now = self.inner.clock.now();
        self.ring().recent(now, level)
    }

    /// Every retained entry regardless of age, most recent first.
    pub fn retained(&self) -> Vec<LogEntry> {
        self.ring().entries().cloned().collect()
    }

    /// Windowed entries as export lines joined by newlines.
    pub fn export_text(&self, level: Option<LogLevel>) -> String {
        self.recent_logs_at_level(level)
            .iter()
            .map(LogEntry::export_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Empties the ring.
    pub fn clear(&self) {
        self.ring().clear();
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.ring().len()
    }

    /// True when nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.ring().is_empty()
    }

    /// True once `init` has installed this service as the global subscriber.
    pub fn is_installed(&self) -> bool {
        self.inner.installed.load(Ordering::Acquire)
    }

    fn ring(&self) -> MutexGuard<'_, LogRing> {
        // A poisoned ring still holds valid entries.
        self.inner.ring.lock().unwrap_or_else(|e| e.into_inner())
    }
}
