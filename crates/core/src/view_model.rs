use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::traits::PortfolioBackend;
use crate::errors::CoreError;
use crate::models::form::HoldingForm;
use crate::models::holding::{Holding, HoldingUpdate, NewHolding};
use crate::models::metrics::PortfolioMetrics;
use crate::models::notification::Notification;
use crate::models::snapshot::{PortfolioSnapshot, ViewState};
use crate::models::symbol::SymbolPolicy;
use crate::services::enrichment_service::EnrichmentService;
use crate::services::metrics_service::MetricsService;
use crate::session::SessionStore;

/// State of one dashboard screen: the holdings list, the pending form and
/// the derived metrics.
///
/// Every backend failure is caught here and recorded as a [`Notification`];
/// the operation also returns the error so callers can branch on it, but
/// nothing needs to propagate further. Local state only changes after the
/// backend confirms a mutation.
///
/// A new [`PortfolioSnapshot`] is published after every state change; see
/// [`subscribe`](Self::subscribe). Dropping the view-model (or an in-flight
/// operation's future) discards any pending update.
pub struct PortfolioViewModel {
    backend: Arc<dyn PortfolioBackend>,
    session: Arc<SessionStore>,
    enrichment: EnrichmentService,
    metrics_service: MetricsService,
    symbol_policy: SymbolPolicy,

    state: ViewState,
    holdings: Vec<Holding>,
    metrics: PortfolioMetrics,
    form: HoldingForm,
    editing_id: Option<String>,
    notifications: Vec<Notification>,

    snapshots: watch::Sender<PortfolioSnapshot>,
}

impl PortfolioViewModel {
    pub fn new(
        backend: Arc<dyn PortfolioBackend>,
        session: Arc<SessionStore>,
        symbol_policy: SymbolPolicy,
    ) -> Self {
        let (snapshots, _) = watch::channel(PortfolioSnapshot::default());
        Self {
            enrichment: EnrichmentService::new(Arc::clone(&backend)),
            backend,
            session,
            metrics_service: MetricsService::new(),
            symbol_policy,
            state: ViewState::Unauthenticated,
            holdings: Vec::new(),
            metrics: PortfolioMetrics::default(),
            form: HoldingForm::default(),
            editing_id: None,
            notifications: Vec::new(),
            snapshots,
        }
    }

    // ── Read access ─────────────────────────────────────────────────

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn metrics(&self) -> &PortfolioMetrics {
        &self.metrics
    }

    pub fn form(&self) -> &HoldingForm {
        &self.form
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn symbol_policy(&self) -> &SymbolPolicy {
        &self.symbol_policy
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// Hand pending notifications to the renderer.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            state: self.state,
            holdings: self.holdings.clone(),
            metrics: self.metrics.clone(),
            form: self.form.clone(),
            editing_id: self.editing_id.clone(),
            last_notification: self.notifications.last().cloned(),
        }
    }

    /// Receive a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<PortfolioSnapshot> {
        self.snapshots.subscribe()
    }

    // ── Form ────────────────────────────────────────────────────────

    pub fn set_form(&mut self, form: HoldingForm) {
        self.form = form;
        self.publish();
    }

    /// Copy a holding into the form; the next [`submit`](Self::submit)
    /// updates it instead of adding a new one.
    pub fn begin_edit(&mut self, holding: &Holding) {
        self.form = HoldingForm::from_holding(holding);
        self.editing_id = Some(holding.id.clone());
        self.publish();
    }

    pub fn cancel_edit(&mut self) {
        self.editing_id = None;
        self.form.clear();
        self.publish();
    }

    /// Validate the form and route to add or update.
    pub async fn submit(&mut self) -> Result<(), CoreError> {
        let draft = match self.form.parse(&self.symbol_policy) {
            Ok(draft) => draft,
            Err(e) => {
                self.notify(Notification::failure("Invalid holding", &e));
                self.publish();
                return Err(e);
            }
        };

        match self.editing_id.clone() {
            Some(id) => {
                // An id missing from the list is reported by update_holding.
                let update = self
                    .holdings
                    .iter()
                    .find(|h| h.id == id)
                    .map(|previous| HoldingUpdate::diff(previous, &draft))
                    .unwrap_or_default();
                self.update_holding(&id, update).await
            }
            None => {
                self.add_holding(&draft.symbol, draft.quantity, draft.buy_price)
                    .await
            }
        }
    }

    // ── Backend operations ──────────────────────────────────────────

    /// Fetch and enrich the holdings list.
    ///
    /// Logged out: nothing is fetched and the state stays
    /// `Unauthenticated`. On a failed list fetch the current list is kept.
    pub async fn load_holdings(&mut self) -> Result<(), CoreError> {
        let Some(auth) = self.session.auth_header() else {
            debug!("skipping holdings load: not logged in");
            self.state = ViewState::Unauthenticated;
            self.publish();
            return Err(CoreError::NotAuthenticated);
        };

        self.state = ViewState::Loading;
        self.publish();

        match self.backend.list_holdings(&auth).await {
            Ok(base) => {
                let enriched = self.enrichment.enrich_all(&auth, base).await;
                debug!(count = enriched.len(), "holdings loaded");
                self.set_holdings(enriched);
                self.state = ViewState::Ready;
                self.publish();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch holdings");
                self.notify(Notification::failure("Failed to load holdings", &e));
                self.state = ViewState::Ready;
                self.publish();
                Err(e)
            }
        }
    }

    /// Submit a new holding; on success clear the form and reload.
    /// On failure the form is left as it was.
    pub async fn add_holding(
        &mut self,
        symbol: &str,
        quantity: f64,
        buy_price: f64,
    ) -> Result<(), CoreError> {
        let auth = self.require_auth()?;
        let holding = match self
            .symbol_policy
            .normalize(symbol)
            .and_then(|symbol| NewHolding::new(symbol, quantity, buy_price))
        {
            Ok(holding) => holding,
            Err(e) => {
                self.notify(Notification::failure("Invalid holding", &e));
                self.publish();
                return Err(e);
            }
        };

        self.state = ViewState::Submitting;
        self.publish();

        match self.backend.add_holding(&auth, &holding).await {
            Ok(()) => {
                info!(symbol = %holding.symbol, "holding added");
                self.form.clear();
                self.notify(Notification::success(format!("Added {}", holding.symbol)));
                // A failed refresh is reported on its own; the add itself succeeded.
                let _ = self.load_holdings().await;
                Ok(())
            }
            Err(e) => {
                warn!(symbol = %holding.symbol, error = %e, "failed to add holding");
                self.notify(Notification::failure("Failed to add holding", &e));
                self.state = ViewState::Ready;
                self.publish();
                Err(e)
            }
        }
    }

    /// Submit changed fields; on success patch the local record in place
    /// without refetching. On failure the edit stays active.
    pub async fn update_holding(&mut self, id: &str, update: HoldingUpdate) -> Result<(), CoreError> {
        let auth = self.require_auth()?;

        let update = match self.normalize_update(update) {
            Ok(update) => update,
            Err(e) => {
                self.notify(Notification::failure("Invalid holding", &e));
                self.publish();
                return Err(e);
            }
        };

        let Some(index) = self.holdings.iter().position(|h| h.id == id) else {
            let e = CoreError::HoldingNotFound(id.to_string());
            self.notify(Notification::failure("Failed to update holding", &e));
            self.publish();
            return Err(e);
        };

        if update.is_empty() {
            debug!(holding_id = id, "no changed fields; nothing to submit");
            self.editing_id = None;
            self.form.clear();
            self.publish();
            return Ok(());
        }

        self.state = ViewState::Submitting;
        self.publish();

        match self.backend.update_holding(&auth, id, &update).await {
            Ok(()) => {
                info!(holding_id = id, "holding updated");
                let merged = self.holdings[index].merged_with(&update);
                self.holdings[index] = merged;
                self.recompute();
                self.editing_id = None;
                self.form.clear();
                self.notify(Notification::success("Holding updated"));
                self.state = ViewState::Ready;
                self.publish();
                Ok(())
            }
            Err(e) => {
                warn!(holding_id = id, error = %e, "failed to update holding");
                self.notify(Notification::failure("Failed to update holding", &e));
                self.state = ViewState::Ready;
                self.publish();
                Err(e)
            }
        }
    }

    /// Delete on the backend, then drop the local record.
    pub async fn delete_holding(&mut self, id: &str) -> Result<(), CoreError> {
        let auth = self.require_auth()?;

        self.state = ViewState::Submitting;
        self.publish();

        match self.backend.delete_holding(&auth, id).await {
            Ok(()) => {
                info!(holding_id = id, "holding deleted");
                self.holdings.retain(|h| h.id != id);
                self.recompute();
                if self.editing_id.as_deref() == Some(id) {
                    self.editing_id = None;
                    self.form.clear();
                }
                self.notify(Notification::success("Holding deleted"));
                self.state = ViewState::Ready;
                self.publish();
                Ok(())
            }
            Err(e) => {
                warn!(holding_id = id, error = %e, "failed to delete holding");
                self.notify(Notification::failure("Failed to delete holding", &e));
                self.state = ViewState::Ready;
                self.publish();
                Err(e)
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn require_auth(&mut self) -> Result<String, CoreError> {
        match self.session.require_auth_header() {
            Ok(auth) => Ok(auth),
            Err(e) => {
                self.state = ViewState::Unauthenticated;
                self.notify(Notification::failure("Please log in", &e));
                self.publish();
                Err(e)
            }
        }
    }

    fn normalize_update(&self, mut update: HoldingUpdate) -> Result<HoldingUpdate, CoreError> {
        if let Some(symbol) = &update.symbol {
            update.symbol = Some(self.symbol_policy.normalize(symbol)?);
        }
        update.validate()?;
        Ok(update)
    }

    fn set_holdings(&mut self, holdings: Vec<Holding>) {
        self.holdings = holdings;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.metrics = self.metrics_service.derive(&self.holdings);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

impl std::fmt::Debug for PortfolioViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioViewModel")
            .field("state", &self.state)
            .field("holdings", &self.holdings.len())
            .field("editing_id", &self.editing_id)
            .field("pending_notifications", &self.notifications.len())
            .finish()
    }
}
