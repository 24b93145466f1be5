use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::CoreError;

/// A single tracked stock position, as returned by the backend.
///
/// `current_price` and `profit_loss` are never user-edited: they come from
/// the backend (list payload or enrichment calls). Use the accessor methods
/// rather than the raw fields when displaying or aggregating, since they
/// apply the fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Backend-assigned identifier, stable for the holding's lifetime
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Stock ticker (e.g., "AAPL", "TCS")
    pub symbol: String,

    /// Number of shares owned
    #[serde(deserialize_with = "de_number")]
    pub quantity: f64,

    /// Price per share at acquisition
    #[serde(rename = "buyPrice", deserialize_with = "de_number")]
    pub buy_price: f64,

    /// Live price per share, when the backend supplied one
    #[serde(
        rename = "currentPrice",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_price: Option<f64>,

    /// Backend-computed profit/loss, when supplied
    #[serde(
        rename = "profitLoss",
        default,
        deserialize_with = "de_opt_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub profit_loss: Option<f64>,
}

impl Holding {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, quantity: f64, buy_price: f64) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            quantity,
            buy_price,
            current_price: None,
            profit_loss: None,
        }
    }

    /// Builder-style setter for the live price.
    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// Builder-style setter for a backend-supplied profit/loss.
    pub fn with_profit_loss(mut self, profit_loss: f64) -> Self {
        self.profit_loss = Some(profit_loss);
        self
    }

    /// Live price, falling back to the buy price when unavailable.
    /// A zero or non-finite price counts as unavailable.
    pub fn effective_current_price(&self) -> f64 {
        self.current_price
            .filter(|p| p.is_finite() && *p != 0.0)
            .unwrap_or(self.buy_price)
    }

    /// Profit/loss for this position.
    ///
    /// The backend value is authoritative when present; otherwise
    /// `(current_price - buy_price) * quantity`.
    pub fn profit_loss(&self) -> f64 {
        self.profit_loss
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| (self.effective_current_price() - self.buy_price) * self.quantity)
    }

    /// Amount invested: `buy_price * quantity`.
    pub fn investment(&self) -> f64 {
        self.buy_price * self.quantity
    }

    /// Gain (including break-even) vs loss, for display styling only.
    pub fn is_gain(&self) -> bool {
        self.profit_loss() >= 0.0
    }

    /// Apply the fallback used when enrichment fails.
    pub(crate) fn with_enrichment_fallback(mut self) -> Self {
        self.current_price = Some(self.buy_price);
        self.profit_loss = Some(0.0);
        self
    }

    /// Merge submitted fields over this record. Price-derived fields are
    /// kept as they were until the next reload.
    pub fn merged_with(&self, update: &HoldingUpdate) -> Holding {
        let mut merged = self.clone();
        if let Some(symbol) = &update.symbol {
            merged.symbol = symbol.clone();
        }
        if let Some(quantity) = update.quantity {
            merged.quantity = quantity;
        }
        if let Some(buy_price) = update.buy_price {
            merged.buy_price = buy_price;
        }
        merged
    }
}

/// Payload for creating a holding. Constructed only through [`NewHolding::new`],
/// which enforces the input invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewHolding {
    pub symbol: String,
    pub quantity: f64,
    #[serde(rename = "buyPrice")]
    pub buy_price: f64,
}

impl NewHolding {
    pub fn new(symbol: impl Into<String>, quantity: f64, buy_price: f64) -> Result<Self, CoreError> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(CoreError::ValidationError("Symbol is required".into()));
        }
        validate_positive("Quantity", quantity)?;
        validate_positive("Buy price", buy_price)?;
        Ok(Self {
            symbol,
            quantity,
            buy_price,
        })
    }
}

/// Changed fields for an update request. Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HoldingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(rename = "buyPrice", skip_serializing_if = "Option::is_none")]
    pub buy_price: Option<f64>,
}

impl HoldingUpdate {
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn buy_price(mut self, buy_price: f64) -> Self {
        self.buy_price = Some(buy_price);
        self
    }

    /// Fields of `draft` that differ from `previous`.
    pub fn diff(previous: &Holding, draft: &NewHolding) -> Self {
        Self {
            symbol: (previous.symbol != draft.symbol).then(|| draft.symbol.clone()),
            quantity: (previous.quantity != draft.quantity).then_some(draft.quantity),
            buy_price: (previous.buy_price != draft.buy_price).then_some(draft.buy_price),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.symbol.is_none() && self.quantity.is_none() && self.buy_price.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(symbol) = &self.symbol {
            if symbol.trim().is_empty() {
                return Err(CoreError::ValidationError("Symbol is required".into()));
            }
        }
        if let Some(quantity) = self.quantity {
            validate_positive("Quantity", quantity)?;
        }
        if let Some(buy_price) = self.buy_price {
            validate_positive("Buy price", buy_price)?;
        }
        Ok(())
    }
}

/// Body of the profit/loss enrichment request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitLossRequest {
    pub symbol: String,
    #[serde(rename = "buyPrice")]
    pub buy_price: f64,
    pub quantity: f64,
}

impl From<&Holding> for ProfitLossRequest {
    fn from(h: &Holding) -> Self {
        Self {
            symbol: h.symbol.clone(),
            buy_price: h.buy_price,
            quantity: h.quantity,
        }
    }
}

fn validate_positive(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "{field} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

// ── Lenient numeric decoding ────────────────────────────────────────
//
// Form submissions reach the backend as strings, so stored records may
// carry "10" where a number is expected.

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid number: {s:?}"))),
        }
    }
}

pub(crate) fn de_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_f64()
}

pub(crate) fn de_opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => v.into_f64().map(Some),
    }
}
