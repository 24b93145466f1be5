use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::holding::{Holding, NewHolding};
use super::symbol::SymbolPolicy;

/// The pending add/edit form. Fields hold raw user input; an empty string
/// means "not filled in".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingForm {
    pub symbol: String,
    pub quantity: String,
    pub buy_price: String,
}

impl HoldingForm {
    pub fn new(
        symbol: impl Into<String>,
        quantity: impl Into<String>,
        buy_price: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: quantity.into(),
            buy_price: buy_price.into(),
        }
    }

    /// Prefill from an existing holding (edit mode).
    pub fn from_holding(holding: &Holding) -> Self {
        Self {
            symbol: holding.symbol.clone(),
            quantity: holding.quantity.to_string(),
            buy_price: holding.buy_price.to_string(),
        }
    }

    /// Reset every field to the empty string.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        self.symbol.is_empty() && self.quantity.is_empty() && self.buy_price.is_empty()
    }

    /// Check that every field is filled in and well-formed.
    pub fn parse(&self, policy: &SymbolPolicy) -> Result<NewHolding, CoreError> {
        let symbol = policy.normalize(&self.symbol)?;
        let quantity = parse_field("Quantity", &self.quantity)?;
        let buy_price = parse_field("Buy price", &self.buy_price)?;
        NewHolding::new(symbol, quantity, buy_price)
    }
}

fn parse_field(field: &str, raw: &str) -> Result<f64, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::ValidationError(format!("{field} is required")));
    }
    raw.parse::<f64>()
        .map_err(|_| CoreError::ValidationError(format!("{field} must be a number, got {raw:?}")))
}
