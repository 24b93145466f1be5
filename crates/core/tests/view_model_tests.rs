// ═══════════════════════════════════════════════════════════════════
// View-Model Tests — load/add/update/delete, enrichment fallback,
// form routing, state machine, snapshot publishing
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stock_portfolio_core::backend::traits::PortfolioBackend;
use stock_portfolio_core::errors::CoreError;
use stock_portfolio_core::models::auth::{Credentials, LoginResponse, RegisterResponse, Registration};
use stock_portfolio_core::models::form::HoldingForm;
use stock_portfolio_core::models::holding::{Holding, HoldingUpdate, NewHolding, ProfitLossRequest};
use stock_portfolio_core::models::notification::NotificationLevel;
use stock_portfolio_core::models::snapshot::ViewState;
use stock_portfolio_core::models::symbol::SymbolPolicy;
use stock_portfolio_core::session::token_store::MemoryTokenStore;
use stock_portfolio_core::session::SessionStore;
use stock_portfolio_core::view_model::PortfolioViewModel;
use stock_portfolio_core::StockPortfolio;

// ═══════════════════════════════════════════════════════════════════
// Mock Backend
// ═══════════════════════════════════════════════════════════════════

/// In-memory backend. Prices are keyed by symbol; symbols without a price
/// fail enrichment. Individual operations can be switched to fail.
#[derive(Default)]
struct MockBackend {
    holdings: Mutex<Vec<Holding>>,
    prices: HashMap<String, f64>,
    /// Artificial latency per symbol for price lookups (ms)
    delays: HashMap<String, u64>,
    failing_profit_loss: HashSet<String>,
    fail_list: AtomicBool,
    fail_add: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
    list_calls: AtomicUsize,
    next_id: AtomicUsize,
    last_update: Mutex<Option<(String, HoldingUpdate)>>,
    seen_auth: Mutex<Vec<String>>,
}

impl MockBackend {
    fn new() -> Self {
        let mut prices = HashMap::new();
        prices.insert("AAPL".to_string(), 120.0);
        prices.insert("TSLA".to_string(), 180.0);
        prices.insert("MSFT".to_string(), 400.0);
        Self {
            prices,
            ..Default::default()
        }
    }

    fn with_holdings(self, holdings: Vec<Holding>) -> Self {
        *self.holdings.lock().unwrap() = holdings;
        self
    }

    fn record_auth(&self, auth: &str) {
        self.seen_auth.lock().unwrap().push(auth.to_string());
    }

    fn stored(&self) -> Vec<Holding> {
        self.holdings.lock().unwrap().clone()
    }

    fn rejected(message: &str) -> CoreError {
        CoreError::Api {
            status: 500,
            message: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl PortfolioBackend for MockBackend {
    async fn register(&self, _registration: &Registration) -> Result<RegisterResponse, CoreError> {
        Ok(RegisterResponse::default())
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, CoreError> {
        Ok(LoginResponse {
            token: "mock-token".into(),
        })
    }

    async fn list_holdings(&self, auth: &str) -> Result<Vec<Holding>, CoreError> {
        self.record_auth(auth);
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::rejected("database unavailable"));
        }
        Ok(self.stored())
    }

    async fn add_holding(&self, auth: &str, holding: &NewHolding) -> Result<(), CoreError> {
        self.record_auth(auth);
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Self::rejected("could not add"));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.holdings.lock().unwrap().push(Holding::new(
            format!("new-{id}"),
            holding.symbol.clone(),
            holding.quantity,
            holding.buy_price,
        ));
        Ok(())
    }

    async fn update_holding(
        &self,
        auth: &str,
        id: &str,
        update: &HoldingUpdate,
    ) -> Result<(), CoreError> {
        self.record_auth(auth);
        *self.last_update.lock().unwrap() = Some((id.to_string(), update.clone()));
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::rejected("could not update"));
        }
        let mut holdings = self.holdings.lock().unwrap();
        let holding = holdings
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| CoreError::Api {
                status: 404,
                message: Some("Stock not found".into()),
            })?;
        *holding = holding.merged_with(update);
        Ok(())
    }

    async fn delete_holding(&self, auth: &str, id: &str) -> Result<(), CoreError> {
        self.record_auth(auth);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::rejected("could not delete"));
        }
        self.holdings.lock().unwrap().retain(|h| h.id != id);
        Ok(())
    }

    async fn current_price(&self, auth: &str, symbol: &str) -> Result<f64, CoreError> {
        self.record_auth(auth);
        if let Some(ms) = self.delays.get(symbol) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| Self::rejected("unknown symbol"))
    }

    async fn profit_loss(
        &self,
        auth: &str,
        request: &ProfitLossRequest,
    ) -> Result<Option<f64>, CoreError> {
        self.record_auth(auth);
        if self.failing_profit_loss.contains(&request.symbol) {
            return Err(Self::rejected("profit/loss unavailable"));
        }
        let price = self
            .prices
            .get(&request.symbol)
            .ok_or_else(|| Self::rejected("unknown symbol"))?;
        Ok(Some((price - request.buy_price) * request.quantity))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn logged_in_session() -> Arc<SessionStore> {
    let session = SessionStore::new(MemoryTokenStore::new());
    session.login("abc123").unwrap();
    Arc::new(session)
}

fn view_model(backend: Arc<MockBackend>) -> PortfolioViewModel {
    PortfolioViewModel::new(backend, logged_in_session(), SymbolPolicy::FreeText)
}

fn aapl() -> Holding {
    Holding::new("h1", "AAPL", 10.0, 100.0)
}

fn tsla() -> Holding {
    Holding::new("h2", "TSLA", 5.0, 200.0)
}

fn has_error(vm: &PortfolioViewModel) -> bool {
    vm.notifications()
        .iter()
        .any(|n| n.level == NotificationLevel::Error)
}

// ═══════════════════════════════════════════════════════════════════
// load_holdings
// ═══════════════════════════════════════════════════════════════════

mod load_holdings {
    use super::*;

    #[tokio::test]
    async fn enriches_with_price_and_profit_loss() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(backend);

        vm.load_holdings().await.unwrap();

        assert_eq!(vm.state(), ViewState::Ready);
        let h = &vm.holdings()[0];
        assert_eq!(h.current_price, Some(120.0));
        assert_eq!(h.profit_loss(), 200.0);
        assert_eq!(vm.metrics().total_investment, 1000.0);
        assert_eq!(vm.metrics().total_profit_loss, 200.0);
    }

    #[tokio::test]
    async fn sends_bearer_header_on_every_call() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl(), tsla()]));
        let mut vm = view_model(Arc::clone(&backend));

        vm.load_holdings().await.unwrap();

        let seen = backend.seen_auth.lock().unwrap();
        // 1 list + 2 × (price + profit/loss)
        assert_eq!(seen.len(), 5);
        assert!(seen.iter().all(|a| a == "Bearer abc123"));
    }

    #[tokio::test]
    async fn failed_price_falls_back_and_keeps_holding() {
        let unknown = Holding::new("h9", "ZZZZ", 3.0, 50.0);
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl(), unknown]));
        let mut vm = view_model(backend);

        vm.load_holdings().await.unwrap();

        assert_eq!(vm.holdings().len(), 2);
        let fallback = &vm.holdings()[1];
        assert_eq!(fallback.id, "h9");
        assert_eq!(fallback.current_price, Some(50.0));
        assert_eq!(fallback.profit_loss(), 0.0);
        // Enrichment failures are never surfaced individually
        assert!(vm.notifications().is_empty());
    }

    #[tokio::test]
    async fn failed_profit_loss_call_also_falls_back() {
        let mut backend = MockBackend::new().with_holdings(vec![aapl()]);
        backend.failing_profit_loss.insert("AAPL".into());
        let mut vm = view_model(Arc::new(backend));

        vm.load_holdings().await.unwrap();

        let h = &vm.holdings()[0];
        assert_eq!(h.current_price, Some(100.0));
        assert_eq!(h.profit_loss(), 0.0);
    }

    #[tokio::test]
    async fn order_follows_list_not_completion() {
        let mut backend = MockBackend::new().with_holdings(vec![
            Holding::new("a", "AAPL", 1.0, 100.0),
            Holding::new("b", "TSLA", 1.0, 100.0),
            Holding::new("c", "MSFT", 1.0, 100.0),
        ]);
        backend.delays.insert("AAPL".into(), 60);
        backend.delays.insert("TSLA".into(), 30);
        let mut vm = view_model(Arc::new(backend));

        vm.load_holdings().await.unwrap();

        let ids: Vec<&str> = vm.holdings().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn list_failure_keeps_previous_list_and_notifies() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();

        backend.fail_list.store(true, Ordering::SeqCst);
        let result = vm.load_holdings().await;

        assert!(result.is_err());
        assert_eq!(vm.holdings().len(), 1);
        assert_eq!(vm.state(), ViewState::Ready);
        let last = vm.last_notification().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert!(last.message.contains("database unavailable"));
    }

    #[tokio::test]
    async fn logged_out_stays_unauthenticated_without_fetching() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let session = Arc::new(SessionStore::new(MemoryTokenStore::new()));
        let mut vm = PortfolioViewModel::new(
            Arc::clone(&backend) as Arc<dyn PortfolioBackend>,
            session,
            SymbolPolicy::FreeText,
        );

        let result = vm.load_holdings().await;

        assert!(matches!(result, Err(CoreError::NotAuthenticated)));
        assert_eq!(vm.state(), ViewState::Unauthenticated);
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 0);
        assert!(vm.holdings().is_empty());
    }

    #[tokio::test]
    async fn empty_list_gives_zero_totals() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(backend);

        vm.load_holdings().await.unwrap();

        assert!(vm.holdings().is_empty());
        assert_eq!(vm.metrics().total_investment, 0.0);
        assert_eq!(vm.metrics().total_profit_loss, 0.0);
        assert_eq!(vm.metrics().holding_count, 0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// add_holding
// ═══════════════════════════════════════════════════════════════════

mod add_holding {
    use super::*;

    #[tokio::test]
    async fn success_resets_form_and_refetches() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(Arc::clone(&backend));
        vm.set_form(HoldingForm::new("TSLA", "5", "200"));

        vm.add_holding("TSLA", 5.0, 200.0).await.unwrap();

        assert_eq!(vm.form(), &HoldingForm::new("", "", ""));
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(vm.holdings().len(), 1);
        let added = &vm.holdings()[0];
        assert_eq!(added.symbol, "TSLA");
        // Refetch applied enrichment: (180 - 200) × 5
        assert_eq!(added.profit_loss(), -100.0);
        assert_eq!(vm.state(), ViewState::Ready);
    }

    #[tokio::test]
    async fn failure_keeps_form_and_list() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        backend.fail_add.store(true, Ordering::SeqCst);
        let form = HoldingForm::new("TSLA", "5", "200");
        vm.set_form(form.clone());

        let result = vm.add_holding("TSLA", 5.0, 200.0).await;

        assert!(result.is_err());
        assert_eq!(vm.form(), &form);
        assert_eq!(vm.holdings().len(), 1);
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
        assert!(has_error(&vm));
        assert_eq!(vm.state(), ViewState::Ready);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_backend() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(Arc::clone(&backend));

        let result = vm.add_holding("TSLA", 0.0, 200.0).await;

        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert!(backend.stored().is_empty());
        assert!(has_error(&vm));
    }

    #[tokio::test]
    async fn enumerated_policy_canonicalizes_symbol() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = PortfolioViewModel::new(
            Arc::clone(&backend) as Arc<dyn PortfolioBackend>,
            logged_in_session(),
            SymbolPolicy::known_symbols(),
        );

        vm.add_holding("msft", 2.0, 350.0).await.unwrap();
        assert_eq!(backend.stored()[0].symbol, "MSFT");

        let result = vm.add_holding("NOPE", 1.0, 1.0).await;
        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert_eq!(backend.stored().len(), 1);
    }

    #[tokio::test]
    async fn logged_out_is_reported() {
        let backend = Arc::new(MockBackend::new());
        let session = Arc::new(SessionStore::new(MemoryTokenStore::new()));
        let mut vm = PortfolioViewModel::new(
            Arc::clone(&backend) as Arc<dyn PortfolioBackend>,
            session,
            SymbolPolicy::FreeText,
        );

        let result = vm.add_holding("TSLA", 5.0, 200.0).await;

        assert!(matches!(result, Err(CoreError::NotAuthenticated)));
        assert_eq!(vm.state(), ViewState::Unauthenticated);
        assert!(has_error(&vm));
        assert!(backend.stored().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// update_holding / begin_edit / submit
// ═══════════════════════════════════════════════════════════════════

mod update_holding {
    use super::*;

    #[tokio::test]
    async fn success_patches_in_place_without_refetch() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl(), tsla()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        vm.begin_edit(&vm.holdings()[0].clone());

        vm.update_holding("h1", HoldingUpdate::default().quantity(20.0))
            .await
            .unwrap();

        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
        let patched = &vm.holdings()[0];
        assert_eq!(patched.quantity, 20.0);
        assert_eq!(patched.symbol, "AAPL");
        // Price-derived fields stay as last fetched until the next reload
        assert_eq!(patched.current_price, Some(120.0));
        assert_eq!(patched.profit_loss, Some(200.0));
        assert_eq!(vm.metrics().total_investment, 2000.0 + 1000.0);
        assert!(vm.editing_id().is_none());
        assert!(vm.form().is_blank());
    }

    #[tokio::test]
    async fn failure_keeps_editing_state() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        vm.begin_edit(&vm.holdings()[0].clone());
        backend.fail_update.store(true, Ordering::SeqCst);

        let result = vm
            .update_holding("h1", HoldingUpdate::default().buy_price(90.0))
            .await;

        assert!(result.is_err());
        assert_eq!(vm.editing_id(), Some("h1"));
        assert_eq!(vm.holdings()[0].buy_price, 100.0);
        assert!(has_error(&vm));
    }

    #[tokio::test]
    async fn unknown_id_is_reported() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();

        let result = vm
            .update_holding("missing", HoldingUpdate::default().quantity(1.0))
            .await;

        assert!(matches!(result, Err(CoreError::HoldingNotFound(_))));
        assert!(backend.last_update.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn begin_edit_prefills_form() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(backend);

        vm.begin_edit(&Holding::new("h7", "INFY", 12.0, 1500.5));

        assert_eq!(vm.form(), &HoldingForm::new("INFY", "12", "1500.5"));
        assert_eq!(vm.editing_id(), Some("h7"));
    }

    #[tokio::test]
    async fn submit_while_editing_sends_only_changed_fields() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        vm.begin_edit(&vm.holdings()[0].clone());
        vm.set_form(HoldingForm::new("AAPL", "15", "100"));

        vm.submit().await.unwrap();

        let (id, update) = backend.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(id, "h1");
        assert_eq!(update, HoldingUpdate::default().quantity(15.0));
        assert_eq!(backend.stored().len(), 1);
        assert_eq!(vm.holdings()[0].quantity, 15.0);
    }

    #[tokio::test]
    async fn submit_for_holding_missing_from_list_is_reported() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        vm.begin_edit(&Holding::new("ghost", "TSLA", 2.0, 150.0));
        vm.set_form(HoldingForm::new("TSLA", "4", "150"));

        let result = vm.submit().await;

        assert!(matches!(result, Err(CoreError::HoldingNotFound(ref id)) if id == "ghost"));
        assert!(backend.last_update.lock().unwrap().is_none());
        assert_eq!(vm.editing_id(), Some("ghost"));
        assert_eq!(
            vm.notifications().last().map(|n| n.message.as_str()),
            Some("Failed to update holding: Holding not found: ghost")
        );
    }

    #[tokio::test]
    async fn submit_without_edit_adds() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(Arc::clone(&backend));
        vm.set_form(HoldingForm::new("AAPL", "3", "110"));

        vm.submit().await.unwrap();

        assert_eq!(backend.stored().len(), 1);
        assert!(backend.last_update.lock().unwrap().is_none());
        assert!(vm.form().is_blank());
    }

    #[tokio::test]
    async fn submit_with_incomplete_form_is_rejected() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(Arc::clone(&backend));
        vm.set_form(HoldingForm::new("AAPL", "", "110"));

        let result = vm.submit().await;

        assert!(matches!(result, Err(CoreError::ValidationError(_))));
        assert!(backend.stored().is_empty());
        // Form kept for correction
        assert_eq!(vm.form().symbol, "AAPL");
    }

    #[tokio::test]
    async fn unchanged_edit_skips_backend() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        vm.begin_edit(&vm.holdings()[0].clone());

        vm.submit().await.unwrap();

        assert!(backend.last_update.lock().unwrap().is_none());
        assert!(vm.editing_id().is_none());
    }

    #[tokio::test]
    async fn cancel_edit_clears_form() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(backend);
        vm.begin_edit(&aapl());

        vm.cancel_edit();

        assert!(vm.editing_id().is_none());
        assert!(vm.form().is_blank());
    }
}

// ═══════════════════════════════════════════════════════════════════
// delete_holding
// ═══════════════════════════════════════════════════════════════════

mod delete_holding {
    use super::*;

    #[tokio::test]
    async fn success_removes_locally() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl(), tsla()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();

        vm.delete_holding("h1").await.unwrap();

        assert_eq!(vm.holdings().len(), 1);
        assert_eq!(vm.holdings()[0].id, "h2");
        assert_eq!(vm.metrics().total_investment, 1000.0);
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_keeps_holding_and_notifies() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        backend.fail_delete.store(true, Ordering::SeqCst);

        let result = vm.delete_holding("h1").await;

        assert!(result.is_err());
        assert!(vm.holdings().iter().any(|h| h.id == "h1"));
        assert!(has_error(&vm));
        assert_eq!(vm.state(), ViewState::Ready);
    }

    #[tokio::test]
    async fn deleting_edited_holding_ends_edit() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        vm.begin_edit(&vm.holdings()[0].clone());

        vm.delete_holding("h1").await.unwrap();

        assert!(vm.editing_id().is_none());
        assert!(vm.form().is_blank());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Snapshots & notifications
// ═══════════════════════════════════════════════════════════════════

mod snapshots {
    use super::*;

    #[tokio::test]
    async fn subscriber_sees_latest_state() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(backend);
        let mut rx = vm.subscribe();

        vm.load_holdings().await.unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.state, ViewState::Ready);
        assert_eq!(snapshot.holdings.len(), 1);
        assert_eq!(snapshot.metrics.total_profit_loss, 200.0);
    }

    #[tokio::test]
    async fn snapshot_carries_last_notification() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let mut vm = view_model(Arc::clone(&backend));
        vm.load_holdings().await.unwrap();
        backend.fail_delete.store(true, Ordering::SeqCst);
        let rx = vm.subscribe();

        let _ = vm.delete_holding("h1").await;

        let snapshot = rx.borrow().clone();
        let notification = snapshot.last_notification.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.contains("could not delete"));
    }

    #[tokio::test]
    async fn drain_empties_queue() {
        let backend = Arc::new(MockBackend::new());
        let mut vm = view_model(backend);
        vm.add_holding("AAPL", 1.0, 100.0).await.unwrap();

        let drained = vm.drain_notifications();

        assert!(!drained.is_empty());
        assert!(vm.notifications().is_empty());
    }

    #[tokio::test]
    async fn facade_dashboard_uses_shared_session() {
        let backend = Arc::new(MockBackend::new().with_holdings(vec![aapl()]));
        let app = StockPortfolio::with_backend(
            Arc::clone(&backend) as Arc<dyn PortfolioBackend>,
            MemoryTokenStore::new(),
        );
        app.login(&Credentials::new("a@b.c", "pw")).await.unwrap();

        let mut dashboard = app.dashboard();
        dashboard.load_holdings().await.unwrap();

        assert_eq!(dashboard.holdings().len(), 1);
        assert!(backend
            .seen_auth
            .lock()
            .unwrap()
            .iter()
            .all(|a| a == "Bearer mock-token"));
    }
}
