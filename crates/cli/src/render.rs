use std::fmt::Write;

use stock_portfolio_core::models::holding::Holding;
use stock_portfolio_core::models::metrics::PortfolioMetrics;

/// Stats, holdings table and investment distribution as plain text.
pub fn dashboard(holdings: &[Holding], metrics: &PortfolioMetrics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total investment : {:.2}", metrics.total_investment);
    let _ = writeln!(
        out,
        "Total profit/loss: {:+.2} ({})",
        metrics.total_profit_loss,
        if metrics.is_gain() { "gain" } else { "loss" }
    );
    let _ = writeln!(out, "Stocks           : {}", metrics.holding_count);

    if holdings.is_empty() {
        let _ = writeln!(out, "\nNo holdings yet.");
        return out;
    }

    let _ = writeln!(
        out,
        "\n{:<26} {:<12} {:>10} {:>12} {:>14} {:>14}",
        "ID", "Symbol", "Quantity", "Buy Price", "Current Price", "Profit/Loss"
    );
    for h in holdings {
        let _ = writeln!(
            out,
            "{:<26} {:<12} {:>10} {:>12.2} {:>14.2} {:>+14.2}",
            h.id,
            h.symbol,
            h.quantity,
            h.buy_price,
            h.effective_current_price(),
            h.profit_loss()
        );
    }

    let _ = writeln!(out, "\nInvestment distribution:");
    for slice in &metrics.investment_series {
        let _ = writeln!(
            out,
            "  {:<12} {:>12.2} ({:.2}%)",
            slice.symbol, slice.amount, slice.percentage
        );
    }
    out
}
