pub mod token_store;

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::errors::CoreError;
use token_store::TokenStore;

/// Route shown to logged-in users.
pub const DASHBOARD_ROUTE: &str = "/dashboard";
/// Route shown to everyone else.
pub const HOME_ROUTE: &str = "/";

/// Single source of truth for authentication state.
///
/// Holds the credential token in memory and mirrors it to a [`TokenStore`]
/// on every change. `is_logged_in` is never stored; it is always derived
/// from the token. Consumers share the store as `Arc<SessionStore>`.
///
/// Writes go to durable storage first while the state lock is held, so a
/// failed write leaves memory untouched and concurrent login/logout calls
/// cannot interleave.
pub struct SessionStore {
    storage: Box<dyn TokenStore>,
    state: Mutex<SessionState>,
    logged_in: watch::Sender<bool>,
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    initialized: bool,
}

impl SessionStore {
    pub fn new(storage: impl TokenStore + 'static) -> Self {
        Self::from_boxed(Box::new(storage))
    }

    pub fn from_boxed(storage: Box<dyn TokenStore>) -> Self {
        let (logged_in, _) = watch::channel(false);
        Self {
            storage,
            state: Mutex::new(SessionState::default()),
            logged_in,
        }
    }

    /// Read the persisted token once. Later calls are no-ops.
    ///
    /// Missing or unreadable storage leaves the session logged out; it is
    /// logged, never returned as an error.
    pub fn initialize(&self) {
        let mut state = self.lock();
        if state.initialized {
            return;
        }
        state.initialized = true;

        match self.storage.load() {
            Ok(Some(token)) => {
                state.token = Some(token);
                info!("session restored from storage");
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "token storage unavailable; starting logged out"),
        }
        self.publish(&state);
    }

    /// Store a credential returned by a successful login.
    ///
    /// The token is opaque; only emptiness is rejected.
    pub fn login(&self, token: impl Into<String>) -> Result<(), CoreError> {
        // Stored and held in the same trimmed form the file store reads back.
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(CoreError::ValidationError("Token must not be empty".into()));
        }

        let mut state = self.lock();
        self.storage.save(&token)?;
        state.token = Some(token);
        state.initialized = true;
        info!("session logged in");
        self.publish(&state);
        Ok(())
    }

    /// Drop the credential. Calling this while logged out is a no-op with
    /// the same end state.
    pub fn logout(&self) -> Result<(), CoreError> {
        let mut state = self.lock();
        self.storage.clear()?;
        let was_logged_in = state.token.take().is_some();
        state.initialized = true;
        if was_logged_in {
            info!("session logged out");
        }
        self.publish(&state);
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().token.is_some()
    }

    /// Current raw token, if any.
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// `Authorization` header value for backend calls; `None` when logged out.
    pub fn auth_header(&self) -> Option<String> {
        self.lock().token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Like [`auth_header`](Self::auth_header) but fails when logged out.
    pub fn require_auth_header(&self) -> Result<String, CoreError> {
        self.auth_header().ok_or(CoreError::NotAuthenticated)
    }

    /// Where the "home" link should point for the current session.
    pub fn home_route(&self) -> &'static str {
        if self.is_logged_in() {
            DASHBOARD_ROUTE
        } else {
            HOME_ROUTE
        }
    }

    /// Watch the logged-in flag. Receivers are woken only on changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.logged_in.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &SessionState) {
        let logged_in = state.token.is_some();
        self.logged_in.send_if_modified(|current| {
            if *current != logged_in {
                *current = logged_in;
                true
            } else {
                false
            }
        });
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SessionStore")
            .field("logged_in", &state.token.is_some())
            .field("initialized", &state.initialized)
            .finish()
    }
}
