//! Task pane controls

/// Status text colour for errors
pub const ERROR_COLOR: &str = "#D13438";
/// Status text colour otherwise
pub const NEUTRAL_COLOR: &str = "#323130";

/// A single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
}

impl TextField {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// A push button. Clicks only do something once a handler is attached and
/// while the button is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    attached: bool,
    enabled: bool,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            attached: false,
            enabled: true,
        }
    }
}

impl Button {
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn attach(&mut self) {
        self.attached = true;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether a click would run the handler
    pub fn accepts_clicks(&self) -> bool {
        self.attached && self.enabled
    }
}

/// Outcome of one calculation, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// One line of status text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
    is_error: bool,
}

impl StatusLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn color(&self) -> &'static str {
        if self.is_error {
            ERROR_COLOR
        } else {
            NEUTRAL_COLOR
        }
    }

    /// Replace the text and styling.
    pub fn report(&mut self, status: &Status) {
        self.text.clone_from(&status.message);
        self.is_error = status.is_error;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.is_error = false;
    }
}

/// The controls of the task pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPane {
    /// Period to calculate, e.g. `Q1`
    pub period: TextField,
    pub calculate: Button,
    pub status: StatusLine,
}
