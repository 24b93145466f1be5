use thiserror::Error;

/// Unified error type for the entire stock-portfolio-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Session / Token storage ─────────────────────────────────────
    #[error("Token storage error: {0}")]
    TokenStorage(String),

    #[error("Not logged in")]
    NotAuthenticated,

    // ── Wire format ─────────────────────────────────────────────────
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── API / Network ───────────────────────────────────────────────
    /// `message` is the backend's own text, `None` when the body had none.
    #[error("API error ({status}): {}", api_detail(.status, .message))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Holding validation failed: {0}")]
    ValidationError(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),
}

impl CoreError {
    /// Text suitable for a user-facing notification.
    ///
    /// API errors surface the backend's own message verbatim, or the status
    /// line when it sent none; everything else falls back to `Display`.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Api { status, message } => api_detail(status, message),
            other => other.to_string(),
        }
    }

    /// The message the backend itself supplied, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            CoreError::Api {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// True if the backend answered with 401/403.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, CoreError::Api { status: 401 | 403, .. })
    }
}

fn api_detail(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => match reqwest::StatusCode::from_u16(*status) {
            Ok(code) => format!("HTTP {code}"),
            Err(_) => format!("HTTP {status}"),
        },
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::TokenStorage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query strings: symbol lookups put user data in the URL.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
