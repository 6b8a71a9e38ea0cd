use std::fmt;

/// Callback run when an alert button is tapped.
pub type ButtonCallback = Box<dyn FnOnce() + Send>;

/// Visual role of an alert button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    /// Regular action.
    #[default]
    Default,
    /// Dismissive action, rendered de-emphasized.
    Cancel,
    /// Irreversible action, rendered as a warning.
    Destructive,
}

/// A button on a modal alert.
pub struct AlertButton {
    label: String,
    style: ButtonStyle,
    on_press: Option<ButtonCallback>,
}

impl AlertButton {
    /// Button with default styling and no callback.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            style: ButtonStyle::Default,
            on_press: None,
        }
    }

    /// Button with cancel styling.
    pub fn cancel(label: impl Into<String>) -> Self {
        Self::new(label).with_style(ButtonStyle::Cancel)
    }

    /// Button with destructive styling.
    pub fn destructive(label: impl Into<String>) -> Self {
        Self::new(label).with_style(ButtonStyle::Destructive)
    }

    /// Sets the style.
    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the callback fired when the button is tapped.
    pub fn on_press<F>(mut self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_press = Some(Box::new(callback));
        self
    }

    /// Button label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Button style.
    pub fn style(&self) -> ButtonStyle {
        self.style
    }
}

impl fmt::Debug for AlertButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertButton")
            .field("label", &self.label)
            .field("style", &self.style)
            .field("has_callback", &self.on_press.is_some())
            .finish()
    }
}

/// A modal alert request.
#[derive(Debug)]
pub struct Alert {
    title: String,
    message: String,
    buttons: Vec<AlertButton>,
}

impl Alert {
    /// Alert with no buttons. A single "OK" button is shown if none are added.
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: Vec::new(),
        }
    }

    /// Appends a button.
    pub fn with_button(mut self, button: AlertButton) -> Self {
        self.buttons.push(button);
        self
    }

    /// Alert title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Alert body text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Buttons as presented.
    pub fn buttons(&self) -> &[AlertButton] {
        &self.buttons
    }

    pub(crate) fn with_default_button(mut self) -> Self {
        if self.buttons.is_empty() {
            self.buttons.push(AlertButton::new("OK"));
        }
        self
    }

    /// Takes the callback of button `index`.
    ///
    /// `None` if there is no such button; `Some(None)` if the button has no
    /// callback or it was already taken.
    pub(crate) fn take_callback(&mut self, index: usize) -> Option<Option<ButtonCallback>> {
        self.buttons.get_mut(index).map(|b| b.on_press.take())
    }

    pub(crate) fn view(&self) -> AlertView {
        AlertView {
            title: self.title.clone(),
            message: self.message.clone(),
            buttons: self
                .buttons
                .iter()
                .map(|b| ButtonView {
                    label: b.label.clone(),
                    style: b.style,
                })
                .collect(),
        }
    }
}

/// Render-side copy of an alert, without callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertView {
    /// Alert title.
    pub title: String,
    /// Alert body text.
    pub message: String,
    /// Buttons in presentation order.
    pub buttons: Vec<ButtonView>,
}

/// Render-side copy of an alert button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    /// Button label.
    pub label: String,
    /// Button style.
    pub style: ButtonStyle,
}
