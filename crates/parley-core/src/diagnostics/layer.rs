use crate::diagnostics::{DiagnosticLog, LogArg, LogLevel};

use std::{error::Error, fmt};

use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{layer::Context, registry::LookupSpan, Layer};

/// Records INFO, WARN and ERROR events into a [`DiagnosticLog`].
///
/// Compose it before the output layer so each line is recorded before it is
/// forwarded. The layer never logs itself.
#[derive(Clone)]
pub struct RingLayer {
    log: DiagnosticLog,
}

impl RingLayer {
    pub(crate) fn new(log: DiagnosticLog) -> Self {
        Self { log }
    }
}

impl<S> Layer<S> for RingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Some(level) = LogLevel::from_tracing(event.metadata().level()) else {
            return;
        };

        let mut visitor = ArgVisitor::default();
        event.record(&mut visitor);
        self.log.record(level, &visitor.into_args());
    }
}

/// Collects the message first, then `name=value` for every other field.
#[derive(Default)]
struct ArgVisitor {
    message: Option<LogArg>,
    fields: Vec<LogArg>,
}

impl ArgVisitor {
    fn into_args(self) -> Vec<LogArg> {
        self.message.into_iter().chain(self.fields).collect()
    }

    fn push(&mut self, field: &Field, value: LogArg) {
        if field.name() == "message" {
            self.message = Some(value);
            return;
        }
        let named = match value {
            LogArg::Primitive(text) => LogArg::Primitive(format!("{}={}", field.name(), text)),
            LogArg::Structured(text) => LogArg::Structured(format!("{}={}", field.name(), text)),
            LogArg::Opaque => LogArg::Opaque,
        };
        self.fields.push(named);
    }
}

impl Visit for ArgVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, LogArg::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, LogArg::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, LogArg::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, LogArg::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, LogArg::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.push(field, LogArg::text(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // The message is `format_args!` output and `%`-recorded fields are
        // `Display` wrappers; both render flat through `Debug`.
        let arg = if field.name() == "message" {
            LogArg::text(DebugAsDisplay(value))
        } else {
            LogArg::debug(value)
        };
        self.push(field, arg);
    }
}

struct DebugAsDisplay<'a>(&'a dyn fmt::Debug);

impl fmt::Display for DebugAsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
