//! Store Counter CLI - compose orders at the counter from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List a category
//! pos-cli products Vegetables
//!
//! # Show one product and its quantity policy
//! pos-cli product 12
//!
//! # Register (or look up) a customer
//! pos-cli register --name "Asha" --phone 9876543210
//!
//! # Compose an order interactively
//! pos-cli session
//! ```
//!
//! # Environment Variables
//!
//! See [`store_counter_terminal::config`]. `--backend-url` overrides
//! `POS_BACKEND_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use store_counter_core::ProductId;
use store_counter_terminal::{HttpBackend, TerminalConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "pos-cli")]
#[command(author, version, about = "Store counter order composition")]
struct Cli {
    /// Backend base URL (overrides `POS_BACKEND_URL`)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the products of a category
    Products {
        /// Category name, e.g. `Vegetables`
        category: String,
    },
    /// Show one product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// Register or look up a customer
    Register {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer phone number
        #[arg(short, long)]
        phone: String,
    },
    /// Compose an order interactively
    Session,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &TerminalConfig) -> Option<sentry::ClientInitGuard> {
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

/// Warnings and errors become Sentry events, info and debug breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn load_config(backend_url: Option<&str>) -> Result<TerminalConfig, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = TerminalConfig::from_lookup(|key| match (key, backend_url) {
        ("POS_BACKEND_URL", Some(url)) => Some(url.to_string()),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

/// Tracing is not up yet when configuration fails.
#[allow(clippy::print_stderr)]
fn report_startup_error(err: &dyn std::error::Error) {
    eprintln!("Failed to load configuration: {err}");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.backend_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            report_startup_error(&*e);
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "store_counter_cli=info,store_counter_terminal=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    tracing::debug!(?config, "Configuration loaded");

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &TerminalConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = HttpBackend::new(config)?;

    match command {
        Commands::Products { category } => commands::catalog::list(&backend, &category).await?,
        Commands::Product { id } => commands::catalog::show(&backend, id).await?,
        Commands::Register { name, phone } => {
            commands::register::run(&backend, &name, &phone).await?;
        }
        Commands::Session => commands::session::run(backend, config.payment_method).await?,
    }
    Ok(())
}
