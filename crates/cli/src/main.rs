//! Mobile Store CLI - browse the catalog and drive the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List phones
//! ms-cli catalog
//!
//! # Show the cart
//! ms-cli cart
//!
//! # Add or remove one unit of a product
//! ms-cli add 1
//! ms-cli remove 1
//!
//! # Place the order
//! ms-cli checkout
//! ```
//!
//! # Environment Variables
//!
//! - `MOBILE_API_URL` - Base URL of the mobiles API (or `--api-url`)
//! - `STOREFRONT_CURRENCY` - Display currency (or `--currency`, default INR)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CommandError, Session};

#[derive(Parser)]
#[command(name = "ms-cli")]
#[command(author, version, about = "Mobile Store CLI")]
struct Cli {
    /// Base URL of the mobiles API
    #[arg(long, env = "MOBILE_API_URL", global = true)]
    api_url: Option<String>,

    /// Currency used to display prices
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "INR", global = true)]
    currency: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the phones in the catalog
    Catalog,
    /// Show the cart
    Cart,
    /// Add one unit of a product to the cart
    Add {
        /// Product id
        id: String,
    },
    /// Remove one unit of a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Submit the cart
    Checkout,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Command output goes through tracing, so default to info when RUST_LOG is unset
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Filter from `RUST_LOG`, falling back to `info` when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let session = Session::connect(cli.api_url.as_deref(), &cli.currency)?;

    match cli.command {
        Commands::Catalog => commands::catalog::list(&session).await,
        Commands::Cart => commands::cart::show(&session).await,
        Commands::Add { id } => commands::cart::add(&session, &id).await,
        Commands::Remove { id } => commands::cart::remove(&session, &id).await,
        Commands::Checkout => commands::cart::checkout(&session).await,
    }
}
