use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::auth::{Credentials, LoginResponse, RegisterResponse, Registration};
use crate::models::holding::{Holding, HoldingUpdate, NewHolding, ProfitLossRequest};

/// Abstraction over the portfolio REST backend.
///
/// [`HttpBackend`](super::http::HttpBackend) talks to the real service;
/// tests substitute an in-memory implementation. Every authorized call
/// takes the full `Authorization` header value (`"Bearer <token>"`).
#[async_trait]
pub trait PortfolioBackend: Send + Sync {
    /// `POST /api/auth/register`
    async fn register(&self, registration: &Registration) -> Result<RegisterResponse, CoreError>;

    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, CoreError>;

    /// `GET /api/dashboard/`: holdings in backend order.
    async fn list_holdings(&self, auth: &str) -> Result<Vec<Holding>, CoreError>;

    /// `POST /api/dashboard/add`
    async fn add_holding(&self, auth: &str, holding: &NewHolding) -> Result<(), CoreError>;

    /// `PUT /api/dashboard/update/{id}`
    async fn update_holding(
        &self,
        auth: &str,
        id: &str,
        update: &HoldingUpdate,
    ) -> Result<(), CoreError>;

    /// `DELETE /api/dashboard/delete/{id}`
    async fn delete_holding(&self, auth: &str, id: &str) -> Result<(), CoreError>;

    /// `GET /api/stocks/price?symbol=`: live price per share.
    async fn current_price(&self, auth: &str, symbol: &str) -> Result<f64, CoreError>;

    /// `POST /api/stocks/profit-loss`: `None` when the backend answered
    /// without a value, leaving the client to compute it.
    async fn profit_loss(
        &self,
        auth: &str,
        request: &ProfitLossRequest,
    ) -> Result<Option<f64>, CoreError>;
}
