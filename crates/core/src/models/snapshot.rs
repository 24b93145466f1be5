use serde::{Deserialize, Serialize};

use super::form::HoldingForm;
use super::holding::Holding;
use super::metrics::PortfolioMetrics;
use super::notification::Notification;

/// Lifecycle of one dashboard screen.
///
/// `Unauthenticated → Loading → Ready ⇄ Submitting → Ready`. Dropping the
/// view-model is the only terminal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewState {
    Unauthenticated,
    Loading,
    Ready,
    Submitting,
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewState::Unauthenticated => write!(f, "Unauthenticated"),
            ViewState::Loading => write!(f, "Loading"),
            ViewState::Ready => write!(f, "Ready"),
            ViewState::Submitting => write!(f, "Submitting"),
        }
    }
}

/// Everything a renderer needs to redraw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub state: ViewState,
    pub holdings: Vec<Holding>,
    pub metrics: PortfolioMetrics,
    pub form: HoldingForm,
    /// Id of the holding being edited; `None` means the form adds.
    pub editing_id: Option<String>,
    pub last_notification: Option<Notification>,
}

impl Default for PortfolioSnapshot {
    fn default() -> Self {
        Self {
            state: ViewState::Unauthenticated,
            holdings: Vec::new(),
            metrics: PortfolioMetrics::default(),
            form: HoldingForm::default(),
            editing_id: None,
            last_notification: None,
        }
    }
}
