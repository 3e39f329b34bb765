//! Medusa storefront CLI - browse the catalog and manage a cart.
//!
//! # Usage
//!
//! ```bash
//! # List the first page of products
//! sf-cli products list --limit 12
//!
//! # Show one product with its variants
//! sf-cli products show prod_1
//!
//! # Add two of a variant to the cart and show it
//! sf-cli cart add var_6 --quantity 2
//! sf-cli cart show
//!
//! # Set a line's quantity (0 removes it)
//! sf-cli cart update item_123 3
//! ```
//!
//! Without `STOREFRONT_BACKEND_URL` everything is served by the in-memory
//! simulator, so carts do not outlive a single invocation.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use medusa_storefront::AppState;
use medusa_storefront::config::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Medusa storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List a page of products
    List {
        /// Page size
        #[arg(long, default_value_t = 12)]
        limit: u32,

        /// Products to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Show one product and its variants
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the current cart
    Show,
    /// Add a variant to the cart
    Add {
        /// Variant ID
        variant_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Set the quantity of a line (0 removes it)
    Update {
        /// Line item ID
        line_item_id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Line item ID
        line_item_id: String,
    },
    /// Forget the current cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "medusa_storefront=info,sf_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config)?;
    tracing::debug!(backend = %state.gateway().primary_kind(), "Storefront ready");

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { limit, offset } => {
                commands::products::list(&state, limit, offset).await?;
            }
            ProductsAction::Show { id } => commands::products::show(&state, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state).await?,
            CartAction::Add {
                variant_id,
                quantity,
            } => commands::cart::add(&state, &variant_id, quantity).await?,
            CartAction::Update {
                line_item_id,
                quantity,
            } => commands::cart::update(&state, &line_item_id, quantity).await?,
            CartAction::Remove { line_item_id } => {
                commands::cart::remove(&state, &line_item_id).await?;
            }
            CartAction::Clear => commands::cart::clear(&state).await,
        },
    }
    Ok(())
}
