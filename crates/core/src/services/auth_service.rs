use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::traits::PortfolioBackend;
use crate::errors::CoreError;
use crate::models::auth::{Credentials, Registration};
use crate::models::notification::Notification;
use crate::session::SessionStore;

/// Registration, login and logout flows on top of the session store.
///
/// Each method returns the notification to show on success. On failure
/// the error comes back untouched and the caller keeps its form fields;
/// [`Notification::from_error`] turns it into the message to display.
pub struct AuthService {
    backend: Arc<dyn PortfolioBackend>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn PortfolioBackend>, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    pub async fn register(&self, registration: &Registration) -> Result<Notification, CoreError> {
        require("Username", &registration.username)?;
        require("Email", &registration.email)?;
        require("Password", &registration.password)?;
        require("Phone", &registration.phone)?;

        let resp = self.backend.register(registration).await.inspect_err(|e| {
            warn!(email = %registration.email, error = %e, "registration rejected");
        })?;

        let username = resp
            .user
            .and_then(|u| u.username)
            .unwrap_or_else(|| registration.username.clone());
        info!(username = %username, "registered");
        Ok(Notification::success(format!(
            "Registered successfully as {username}"
        )))
    }

    /// Exchange credentials for a token and start the session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Notification, CoreError> {
        require("Email", &credentials.email)?;
        require("Password", &credentials.password)?;

        let resp = self.backend.login(credentials).await.inspect_err(|e| {
            warn!(email = %credentials.email, error = %e, "login rejected");
        })?;
        self.session.login(resp.token)?;
        Ok(Notification::success("Login successful!"))
    }

    pub fn logout(&self) -> Result<Notification, CoreError> {
        self.session.logout()?;
        Ok(Notification::success("Logged out successfully!"))
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}
