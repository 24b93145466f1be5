use serde::{Deserialize, Serialize};

/// Aggregates derived from the current holdings list. Never persisted.
///
/// Renderers only draw these; every number is computed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Σ buy_price × quantity
    pub total_investment: f64,

    /// Σ profit/loss of each holding
    pub total_profit_loss: f64,

    /// Number of holdings (the "Stocks" stat card)
    pub holding_count: usize,

    /// Line chart: profit/loss per holding, labelled by symbol
    pub profit_loss_series: Vec<SeriesPoint>,

    /// Bar chart: quantity per holding, labelled by symbol
    pub quantity_series: Vec<SeriesPoint>,

    /// Pie chart: investment per holding with its share of the total
    pub investment_series: Vec<AllocationSlice>,
}

impl PortfolioMetrics {
    /// Gain (including break-even) vs loss, for display styling only.
    pub fn is_gain(&self) -> bool {
        self.total_profit_loss >= 0.0
    }
}

/// One labelled value in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub symbol: String,
    pub value: f64,
}

/// One slice of the investment distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub symbol: String,

    /// buy_price × quantity
    pub amount: f64,

    /// amount / total_investment × 100; 0 when the total is 0
    pub percentage: f64,
}
