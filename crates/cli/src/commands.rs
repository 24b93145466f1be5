//! Command execution. Each command yields a [`Report`] that `main` prints.

use stock_portfolio_core::errors::CoreError;
use stock_portfolio_core::models::auth::{Credentials, Registration};
use stock_portfolio_core::models::form::HoldingForm;
use stock_portfolio_core::models::holding::HoldingUpdate;
use stock_portfolio_core::models::notification::Notification;
use stock_portfolio_core::view_model::PortfolioViewModel;
use stock_portfolio_core::StockPortfolio;

use crate::render;
use crate::Commands;

/// What a command produced.
#[derive(Debug)]
pub struct Report {
    pub notifications: Vec<Notification>,
    /// Rendered dashboard or status line
    pub output: Option<String>,
    pub result: Result<(), CoreError>,
}

impl Report {
    fn status(line: String) -> Self {
        Self {
            notifications: Vec::new(),
            output: Some(line),
            result: Ok(()),
        }
    }

    /// Errors go to stderr, everything else to stdout.
    pub fn print(&self) {
        for notification in &self.notifications {
            if notification.is_error() {
                eprintln!("{notification}");
            } else {
                println!("{notification}");
            }
        }
        if let Some(output) = &self.output {
            print!("{output}");
        }
    }
}

pub async fn execute(app: &StockPortfolio, command: Commands) -> Report {
    match command {
        Commands::Register {
            username,
            email,
            password,
            phone,
        } => {
            let registration = Registration {
                username,
                email,
                password,
                phone,
            };
            auth_report(app.register(&registration).await, "Registration failed")
        }
        Commands::Login { email, password } => {
            let outcome = app.login(&Credentials::new(email, password)).await;
            auth_report(outcome, "Login failed")
        }
        Commands::Logout => auth_report(app.logout(), "Logout failed"),
        Commands::Status => {
            let state = if app.is_logged_in() { "Logged in" } else { "Logged out" };
            Report::status(format!("{state} (home: {})\n", app.session().home_route()))
        }
        Commands::Holdings => {
            let mut dashboard = app.dashboard();
            let result = dashboard.load_holdings().await;
            dashboard_report(&mut dashboard, result)
        }
        Commands::Add {
            symbol,
            quantity,
            buy_price,
        } => {
            let mut dashboard = app.dashboard();
            dashboard.set_form(HoldingForm::new(symbol, quantity, buy_price));
            let result = dashboard.submit().await;
            dashboard_report(&mut dashboard, result)
        }
        Commands::Update {
            id,
            symbol,
            quantity,
            buy_price,
        } => {
            let update = HoldingUpdate {
                symbol,
                quantity,
                buy_price,
            };
            let mut dashboard = app.dashboard();
            // Patching needs the current record.
            let result = match dashboard.load_holdings().await {
                Ok(()) => dashboard.update_holding(&id, update).await,
                Err(e) => Err(e),
            };
            dashboard_report(&mut dashboard, result)
        }
        Commands::Delete { id } => {
            let mut dashboard = app.dashboard();
            let result = match dashboard.load_holdings().await {
                Ok(()) => dashboard.delete_holding(&id).await,
                Err(e) => Err(e),
            };
            dashboard_report(&mut dashboard, result)
        }
    }
}

/// Drain the dashboard's notifications and render it when the command succeeded.
fn dashboard_report(dashboard: &mut PortfolioViewModel, result: Result<(), CoreError>) -> Report {
    let output = result
        .is_ok()
        .then(|| render::dashboard(dashboard.holdings(), dashboard.metrics()));
    Report {
        notifications: dashboard.drain_notifications(),
        output,
        result,
    }
}

fn auth_report(outcome: Result<Notification, CoreError>, fallback: &str) -> Report {
    match outcome {
        Ok(notification) => Report {
            notifications: vec![notification],
            output: None,
            result: Ok(()),
        },
        Err(e) => Report {
            notifications: vec![Notification::from_error(&e, fallback)],
            output: None,
            result: Err(e),
        },
    }
}
