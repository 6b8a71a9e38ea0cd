use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Process-wide exclusive right to record.
///
/// Every capture session built from clones of the same gate competes for a
/// single holder. A session holds the guard from a successful `start` until
/// stop, cancel or teardown; a second session's `start` is refused instead
/// of blocking.
#[derive(Debug, Clone, Default)]
pub struct CaptureGate {
    lock: Arc<Mutex<()>>,
}

impl CaptureGate {
    /// Creates a gate with no holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while some session is recording through this gate.
    pub fn is_held(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    pub(crate) fn try_acquire(&self) -> Option<OwnedMutexGuard<()>> {
        Arc::clone(&self.lock).try_lock_owned().ok()
    }
}
