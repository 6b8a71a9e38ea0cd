mod clock;
mod entry;
mod layer;
mod ring;
mod service;

pub use {
    clock::{Clock, ManualClock, SystemClock},
    entry::{LogArg, LogEntry, LogLevel, OPAQUE_PLACEHOLDER, flatten_args},
    layer::RingLayer,
    ring::{DEFAULT_LOG_CAPACITY, DEFAULT_LOG_WINDOW, LogRing, LogRingSettings},
    service::DiagnosticLog,
};
