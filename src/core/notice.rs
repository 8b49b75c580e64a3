//! Transient messages shown to the operator on top of the main view.

use std::fmt;

pub const CANCELED_TEXT: &str = "Action has been canceled.";
pub const ACTION_FAILED_TEXT: &str = "Action failed: the server could not be reached.";
pub const UNSUPPORTED_TEXT: &str = "Your client does not support WebSockets. The chat won't work.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    /// Capability warnings; shown once, never repeated.
    Alert,
    Info,
}

impl NoticeKind {
    pub fn title(&self) -> &'static str {
        match self {
            NoticeKind::Success => "Success",
            NoticeKind::Error => "Error",
            NoticeKind::Alert => "Warning",
            NoticeKind::Info => "Info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Alert,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn canceled() -> Self {
        Self::success(CANCELED_TEXT)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.title(), self.text)
    }
}
