mod alert;
mod queue;
mod slot;
mod toast;

pub use {
    alert::{Alert, AlertButton, AlertView, ButtonCallback, ButtonStyle, ButtonView},
    queue::{
        PresentationHandle, PresentationQueue, PresentationRequest, PresentationSnapshot,
        PresentationTimings,
    },
    slot::{Phase, SlotKind},
    toast::{DEFAULT_TOAST_DURATION, Toast, ToastKind},
};

#[cfg(test)]
pub(crate) use slot::TimerEvent;
