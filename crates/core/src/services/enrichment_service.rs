use std::sync::Arc;

use futures_util::future::join_all;
use tracing::warn;

use crate::backend::traits::PortfolioBackend;
use crate::models::holding::{Holding, ProfitLossRequest};

/// Attaches live price and profit/loss to base holding records.
///
/// Enrichment never fails as a whole: a holding whose price or
/// profit/loss call fails gets `current_price = buy_price` and
/// `profit_loss = 0` and stays in the list.
pub struct EnrichmentService {
    backend: Arc<dyn PortfolioBackend>,
}

impl EnrichmentService {
    pub fn new(backend: Arc<dyn PortfolioBackend>) -> Self {
        Self { backend }
    }

    /// Enrich every holding concurrently. Output order matches input order
    /// regardless of which request finishes first.
    pub async fn enrich_all(&self, auth: &str, holdings: Vec<Holding>) -> Vec<Holding> {
        join_all(holdings.into_iter().map(|h| self.enrich(auth, h))).await
    }

    /// Enrich one holding; both calls are issued together.
    pub async fn enrich(&self, auth: &str, holding: Holding) -> Holding {
        let request = ProfitLossRequest::from(&holding);
        let (price, profit_loss) = futures_util::join!(
            self.backend.current_price(auth, &holding.symbol),
            self.backend.profit_loss(auth, &request),
        );

        match (price, profit_loss) {
            (Ok(price), Ok(profit_loss)) => Holding {
                current_price: Some(price),
                profit_loss,
                ..holding
            },
            (Err(e), _) | (_, Err(e)) => {
                warn!(
                    symbol = %holding.symbol,
                    holding_id = %holding.id,
                    error = %e,
                    "enrichment failed; falling back to buy price"
                );
                holding.with_enrichment_fallback()
            }
        }
    }
}
