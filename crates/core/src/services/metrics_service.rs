use crate::models::holding::Holding;
use crate::models::metrics::{AllocationSlice, PortfolioMetrics, SeriesPoint};

/// Derives display aggregates from a holdings list.
///
/// Pure business logic with no I/O. Every series keeps one
/// entry per holding, in list order, labelled by symbol.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    pub fn derive(&self, holdings: &[Holding]) -> PortfolioMetrics {
        let total_investment: f64 = holdings.iter().map(Holding::investment).sum();
        let total_profit_loss: f64 = holdings.iter().map(Holding::profit_loss).sum();

        let profit_loss_series = holdings
            .iter()
            .map(|h| SeriesPoint {
                symbol: h.symbol.clone(),
                value: h.profit_loss(),
            })
            .collect();

        let quantity_series = holdings
            .iter()
            .map(|h| SeriesPoint {
                symbol: h.symbol.clone(),
                value: h.quantity,
            })
            .collect();

        let investment_series = holdings
            .iter()
            .map(|h| {
                let amount = h.investment();
                AllocationSlice {
                    symbol: h.symbol.clone(),
                    amount,
                    percentage: percentage_of(amount, total_investment),
                }
            })
            .collect();

        PortfolioMetrics {
            total_investment,
            total_profit_loss,
            holding_count: holdings.len(),
            profit_loss_series,
            quantity_series,
            investment_series,
        }
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
