use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Success,
    Error,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Success => write!(f, "Success"),
            NotificationLevel::Error => write!(f, "Error"),
        }
    }
}

/// A user-visible message (toast in a browser, a printed line in the CLI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Error notification carrying the backend's message when it sent one,
    /// `fallback` otherwise.
    pub fn from_error(err: &CoreError, fallback: &str) -> Self {
        match err.backend_message() {
            Some(message) if !message.trim().is_empty() => Self::error(message),
            _ => Self::error(fallback),
        }
    }

    /// Error notification of the form `"<context>: <detail>"`.
    pub fn failure(context: &str, err: &CoreError) -> Self {
        Self::error(format!("{context}: {}", err.user_message()))
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
