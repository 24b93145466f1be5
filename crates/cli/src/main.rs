//! stock-portfolio - command-line front end for the portfolio backend.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stock_portfolio_core::models::symbol::SymbolPolicy;
use stock_portfolio_core::session::token_store::FileTokenStore;
use stock_portfolio_core::StockPortfolio;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

const DEFAULT_TOKEN_FILE: &str = ".portfolio_token";

/// Track a stock portfolio kept by the portfolio backend (`PORTFOLIO_API_URL`)
#[derive(Parser, Debug)]
#[command(name = "stock-portfolio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Only accept symbols from the built-in list (case-insensitive)
    #[arg(long, global = true)]
    known_symbols: bool,

    /// Where the session token is kept
    #[arg(long, global = true, env = "PORTFOLIO_TOKEN_FILE", default_value = DEFAULT_TOKEN_FILE)]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Session ===
    /// Create an account
    Register {
        username: String,
        email: String,
        password: String,
        phone: String,
    },

    /// Log in and keep the session token
    Login { email: String, password: String },

    /// Forget the session token
    Logout,

    /// Show whether a session is active
    Status,

    // === Holdings ===
    /// Show stats, holdings and investment distribution
    Holdings,

    /// Add a holding
    Add {
        symbol: String,
        #[arg(allow_negative_numbers = true)]
        quantity: String,
        #[arg(allow_negative_numbers = true)]
        buy_price: String,
    },

    /// Change fields of an existing holding
    Update {
        /// Holding id as shown by `holdings`
        id: String,

        #[arg(long)]
        symbol: Option<String>,

        #[arg(long)]
        quantity: Option<f64>,

        #[arg(long)]
        buy_price: Option<f64>,
    },

    /// Delete a holding
    Delete {
        /// Holding id as shown by `holdings`
        id: String,
    },
}

impl Commands {
    /// Name for logs; arguments may carry credentials.
    fn name(&self) -> &'static str {
        match self {
            Commands::Register { .. } => "register",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Status => "status",
            Commands::Holdings => "holdings",
            Commands::Add { .. } => "add",
            Commands::Update { .. } => "update",
            Commands::Delete { .. } => "delete",
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_portfolio=info,stock_portfolio_core=info".into()),
        )
        .init();

    let mut app = match StockPortfolio::from_env(FileTokenStore::new(cli.token_file)) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if cli.known_symbols {
        app = app.with_symbol_policy(SymbolPolicy::known_symbols());
    }
    app.initialize();

    tracing::debug!(command = cli.command.name(), "dispatching");
    let report = commands::execute(&app, cli.command).await;
    report.print();
    if let Err(e) = report.result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
