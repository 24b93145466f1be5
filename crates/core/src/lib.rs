pub mod backend;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod session;
pub mod view_model;

use std::sync::Arc;

use backend::{http::HttpBackend, traits::PortfolioBackend};
use config::ClientConfig;
use errors::CoreError;
use models::{
    auth::{Credentials, Registration},
    notification::Notification,
    symbol::SymbolPolicy,
};
use services::auth_service::AuthService;
use session::{token_store::TokenStore, SessionStore};
use view_model::PortfolioViewModel;

/// Main entry point for the stock portfolio client.
///
/// Owns the session (one per process) and the backend client, and hands
/// out a fresh [`PortfolioViewModel`] per dashboard screen.
#[must_use]
pub struct StockPortfolio {
    backend: Arc<dyn PortfolioBackend>,
    session: Arc<SessionStore>,
    auth_service: AuthService,
    symbol_policy: SymbolPolicy,
}

impl std::fmt::Debug for StockPortfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockPortfolio")
            .field("session", &self.session)
            .field("symbol_policy", &self.symbol_policy)
            .finish()
    }
}

impl StockPortfolio {
    /// Connect to the backend at `config` and persist the token in `storage`.
    pub fn new(config: ClientConfig, storage: impl TokenStore + 'static) -> Self {
        Self::with_backend(Arc::new(HttpBackend::new(config)), storage)
    }

    /// Build from environment configuration (`PORTFOLIO_API_URL`).
    pub fn from_env(storage: impl TokenStore + 'static) -> Result<Self, CoreError> {
        Ok(Self::new(ClientConfig::from_env()?, storage))
    }

    /// Use any backend implementation (tests, alternative transports).
    pub fn with_backend(
        backend: Arc<dyn PortfolioBackend>,
        storage: impl TokenStore + 'static,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        let auth_service = AuthService::new(Arc::clone(&backend), Arc::clone(&session));
        Self {
            backend,
            session,
            auth_service,
            symbol_policy: SymbolPolicy::default(),
        }
    }

    /// Choose how dashboards accept symbols (free text by default).
    pub fn with_symbol_policy(mut self, policy: SymbolPolicy) -> Self {
        self.symbol_policy = policy;
        self
    }

    /// Restore a persisted session. Safe to call more than once.
    pub fn initialize(&self) {
        self.session.initialize();
    }

    // ── Session ─────────────────────────────────────────────────────

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub async fn register(&self, registration: &Registration) -> Result<Notification, CoreError> {
        self.auth_service.register(registration).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Notification, CoreError> {
        self.auth_service.login(credentials).await
    }

    pub fn logout(&self) -> Result<Notification, CoreError> {
        self.auth_service.logout()
    }

    // ── Dashboard ───────────────────────────────────────────────────

    /// A new dashboard screen bound to this session.
    pub fn dashboard(&self) -> PortfolioViewModel {
        PortfolioViewModel::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.session),
            self.symbol_policy.clone(),
        )
    }
}
