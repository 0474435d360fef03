//! Corner Market CLI - drive the storefront client from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Check the backend is reachable
//! market check
//!
//! # Print the storefront page after the initial load
//! market render
//!
//! # Add to cart and check out
//! market add 2 --qty 3
//! market checkout
//!
//! # List countries, or follow one country's card
//! market countries
//! market countries --open pt
//! ```
//!
//! # Environment Variables
//!
//! - `MARKET_API_BASE_URL` - Backend base URL (default `http://localhost:4567`)
//! - `MARKET_MESSAGE_TIMEOUT_MS` - Notification auto-hide delay
//! - `MARKET_PLACEHOLDER_IMAGE` - Image used when a product or flag has none
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write as _;

use clap::{Parser, Subcommand};
use market_core::ProductId;
use market_storefront::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "market")]
#[command(author, version, about = "Corner Market storefront client")]
struct Cli {
    /// Backend base URL, overriding `MARKET_API_BASE_URL`
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Check,
    /// Load the storefront and print the page
    Render,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i32,
    },
    /// Check out the current cart
    Checkout,
    /// List countries
    Countries {
        /// Click the card of this country and print where it leads
        #[arg(long)]
        open: Option<String>,

        /// Print the whole directory page instead of a list
        #[arg(long, conflicts_with = "open")]
        html: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "market_storefront=info,market_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn load_config(cli: &Cli) -> Result<StorefrontConfig, CommandError> {
    let config = StorefrontConfig::from_env()?;
    Ok(match cli.base_url.as_deref() {
        Some(raw) => config.with_base_url(raw)?,
        None => config,
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing();

    match run(cli.command, &config).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{output}") {
                tracing::error!("Failed to write output: {e}");
                drop(sentry_guard);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            drop(sentry_guard);
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands, config: &StorefrontConfig) -> Result<String, CommandError> {
    match command {
        Commands::Check => commands::check::run(config).await,
        Commands::Render => commands::storefront::render(config).await,
        Commands::Add { product_id, qty } => {
            commands::storefront::add(config, product_id, qty).await
        }
        Commands::Checkout => commands::storefront::checkout(config).await,
        Commands::Countries { open, html } => {
            commands::countries::run(config, open.as_deref(), html).await
        }
    }
}
