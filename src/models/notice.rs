use serde::{Deserialize, Serialize};

use crate::utils::SwapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    pub fn emoji(&self) -> &'static str {
        match self {
            NoticeKind::Info => "ℹ️",
            NoticeKind::Success => "✅",
            NoticeKind::Error => "❌",
        }
    }
}

/// Transient banner shown to the user after an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    /// Error banner for a failed action, e.g. `Error executing swap: ...`
    pub fn from_error(context: &str, err: &SwapError) -> Self {
        tracing::error!("{}: {}", context, err);
        Self::error(format!("{}: {}", context, err.friendly_message()))
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.emoji(), self.message)
    }
}
