use crate::errors::CoreError;

/// Tickers offered by the constrained (dropdown) form variant.
pub const KNOWN_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "NFLX",
    "RELIANCE", "TCS", "INFY", "HDFCBANK", "ICICIBANK", "SBIN", "ITC", "WIPRO",
];

/// How the holdings form accepts a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SymbolPolicy {
    /// Any non-empty text, kept as typed (trimmed).
    #[default]
    FreeText,
    /// One of a fixed set of tickers, matched case-insensitively.
    Enumerated(Vec<String>),
}

impl SymbolPolicy {
    /// Enumerated policy over [`KNOWN_SYMBOLS`].
    pub fn known_symbols() -> Self {
        SymbolPolicy::Enumerated(KNOWN_SYMBOLS.iter().map(|s| s.to_string()).collect())
    }

    /// Selectable options, if this policy is enumerated.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            SymbolPolicy::FreeText => None,
            SymbolPolicy::Enumerated(symbols) => Some(symbols),
        }
    }

    /// Validate raw input and return the symbol to submit.
    pub fn normalize(&self, raw: &str) -> Result<String, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::ValidationError("Symbol is required".into()));
        }
        match self {
            SymbolPolicy::FreeText => Ok(trimmed.to_string()),
            SymbolPolicy::Enumerated(symbols) => symbols
                .iter()
                .find(|s| s.eq_ignore_ascii_case(trimmed))
                .cloned()
                .ok_or_else(|| {
                    CoreError::ValidationError(format!("Unknown symbol: {trimmed}"))
                }),
        }
    }
}
