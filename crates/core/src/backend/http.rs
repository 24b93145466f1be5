use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::CoreError;
use crate::models::auth::{Credentials, LoginResponse, RegisterResponse, Registration};
use crate::models::holding::{de_opt_number, Holding, HoldingUpdate, NewHolding, ProfitLossRequest};
use super::traits::PortfolioBackend;

/// reqwest-backed client for the portfolio REST API.
///
/// No client-side timeout is configured; hung requests are left to the
/// transport defaults.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Use a preconfigured client (proxies, custom TLS roots, ...).
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Send a request, map non-2xx answers to [`CoreError::Api`], and return
    /// the raw body text.
    async fn execute(&self, request: RequestBuilder, what: &str) -> Result<String, CoreError> {
        debug!(request = what, "sending backend request");
        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }
        Ok(text)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, CoreError> {
        let text = self.execute(request, what).await?;
        serde_json::from_str(&text).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse {what} response: {e}"))
        })
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("api_url", &self.config.api_url())
            .finish()
    }
}

// ── Backend response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct HoldingsResponse {
    #[serde(default)]
    stocks: Option<Vec<Holding>>,
}

#[derive(Deserialize)]
struct PriceResponse {
    #[serde(rename = "currentPrice", default, deserialize_with = "de_opt_number")]
    current_price: Option<f64>,
}

#[derive(Deserialize)]
struct ProfitLossResponse {
    #[serde(rename = "profitLoss", default, deserialize_with = "de_opt_number")]
    profit_loss: Option<f64>,
}

/// Build an API error from a failed response, keeping the backend's
/// `{"message": ...}` body when it has a non-blank one.
pub(crate) fn api_error(status: StatusCode, body: &str) -> CoreError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    CoreError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl PortfolioBackend for HttpBackend {
    async fn register(&self, registration: &Registration) -> Result<RegisterResponse, CoreError> {
        let req = self.client.post(self.url("/api/auth/register")).json(registration);
        let text = self.execute(req, "register").await?;
        // Some deployments answer 201 with an empty body.
        if text.trim().is_empty() {
            return Ok(RegisterResponse::default());
        }
        serde_json::from_str(&text).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse register response: {e}"))
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, CoreError> {
        let req = self.client.post(self.url("/api/auth/login")).json(credentials);
        self.execute_json(req, "login").await
    }

    async fn list_holdings(&self, auth: &str) -> Result<Vec<Holding>, CoreError> {
        let req = self
            .client
            .get(self.url("/api/dashboard/"))
            .header(AUTHORIZATION, auth);
        let resp: HoldingsResponse = self.execute_json(req, "list holdings").await?;
        Ok(resp.stocks.unwrap_or_default())
    }

    async fn add_holding(&self, auth: &str, holding: &NewHolding) -> Result<(), CoreError> {
        let req = self
            .client
            .post(self.url("/api/dashboard/add"))
            .header(AUTHORIZATION, auth)
            .json(holding);
        self.execute(req, "add holding").await.map(|_| ())
    }

    async fn update_holding(
        &self,
        auth: &str,
        id: &str,
        update: &HoldingUpdate,
    ) -> Result<(), CoreError> {
        let req = self
            .client
            .put(self.url(&format!("/api/dashboard/update/{id}")))
            .header(AUTHORIZATION, auth)
            .json(update);
        self.execute(req, "update holding").await.map(|_| ())
    }

    async fn delete_holding(&self, auth: &str, id: &str) -> Result<(), CoreError> {
        let req = self
            .client
            .delete(self.url(&format!("/api/dashboard/delete/{id}")))
            .header(AUTHORIZATION, auth);
        self.execute(req, "delete holding").await.map(|_| ())
    }

    async fn current_price(&self, auth: &str, symbol: &str) -> Result<f64, CoreError> {
        let req = self
            .client
            .get(self.url("/api/stocks/price"))
            .query(&[("symbol", symbol)])
            .header(AUTHORIZATION, auth);
        let resp: PriceResponse = self.execute_json(req, "current price").await?;
        resp.current_price.ok_or_else(|| {
            CoreError::Deserialization(format!("No current price for {symbol}"))
        })
    }

    async fn profit_loss(
        &self,
        auth: &str,
        request: &ProfitLossRequest,
    ) -> Result<Option<f64>, CoreError> {
        let req = self
            .client
            .post(self.url("/api/stocks/profit-loss"))
            .header(AUTHORIZATION, auth)
            .json(request);
        let resp: ProfitLossResponse = self.execute_json(req, "profit/loss").await?;
        Ok(resp.profit_loss)
    }
}
