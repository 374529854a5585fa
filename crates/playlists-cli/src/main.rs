//! playlists - command-line client for the playlists API.
//!
//! Logs in against the backend's `/auth` endpoints, keeps the session in the
//! configured store, and sends authenticated requests with it.

mod commands;
mod navigator;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use playlists_core::{ApiClient, AuthController, Config};

use navigator::TerminalNavigator;

#[derive(Debug, Parser)]
#[command(name = "playlists", version, about = "Command-line client for the playlists API")]
struct Cli {
    /// Backend base URL (overrides config and PUBLIC_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session store: file or keyring
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Read from the terminal when omitted
        #[arg(long, env = "PLAYLISTS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Log in again even if a session is stored
        #[arg(long)]
        force: bool,
    },
    /// Create an account and store the session
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, env = "PLAYLISTS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Status {
        /// Ask the server for the current profile
        #[arg(long)]
        refresh: bool,
    },
    /// Send an authenticated request and print the reply
    Request {
        /// Path relative to the API URL, or an absolute URL
        path: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// Extra header as 'Name: value'; replaces a default of the same name
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// Request body; '@file' reads it from a file
        #[arg(short = 'd', long)]
        data: Option<String>,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(ref url) = cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(ref store) = cli.store {
        config.store = store.parse()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(api_url = %config.api_url, store = %config.store, "playlists starting");

    let api = ApiClient::from_config(&config)?;
    let controller = AuthController::new(api, Arc::new(TerminalNavigator));

    match cli.command {
        Command::Login { email, password, force } => {
            commands::login(&controller, &email, password, force).await
        }
        Command::Register { email, first_name, last_name, password } => {
            commands::register(&controller, email, first_name, last_name, password).await
        }
        Command::Logout => {
            commands::logout(&controller);
            Ok(())
        }
        Command::Status { refresh } => commands::status(&controller, refresh).await,
        Command::Request { path, method, headers, data } => {
            commands::request(&controller, &path, &method, &headers, data.as_deref()).await
        }
    }
}
