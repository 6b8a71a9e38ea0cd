use std::time::Duration;

/// How long a toast stays up before it dismisses itself.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral notice.
    Info,
}

impl ToastKind {
    /// Severity label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Error => "ERR",
            Self::Info => "INFO",
        }
    }
}

/// A transient banner request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity.
    pub kind: ToastKind,
    /// Primary line.
    pub text: String,
    /// Optional secondary line.
    pub detail: Option<String>,
}

impl Toast {
    /// Toast of the given kind with no secondary line.
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            detail: None,
        }
    }

    /// Success toast.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, text)
    }

    /// Error toast.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, text)
    }

    /// Info toast.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, text)
    }

    /// Sets the secondary line.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}
