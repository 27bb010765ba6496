//! # Storefront Order Viewer
//!
//! Signs in to the backend and prints the filtered order list with a
//! status summary. Admins see every order in the store.
//!
//! ## Usage
//! ```bash
//! export GROCER_EMAIL=asha@example.in GROCER_PASSWORD=secret
//!
//! # Newest first (default)
//! cargo run -p grocer-client --bin storefront
//!
//! # Cancelled orders from the last 30 days, cheapest first
//! cargo run -p grocer-client --bin storefront -- --status cancelled --range 30d --sort price-asc
//!
//! # Free-text search and a custom config file
//! cargo run -p grocer-client --bin storefront -- --query paneer --config ./storefront.toml
//! ```
//!
//! `RUST_LOG` controls log output (default `info,grocer_client=debug,grocer_core=debug`).

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use grocer_client::{
    ApiClient, FileThemeStore, LocalThemeStore, MemoryThemeStore, Storefront, StorefrontConfig,
    ThemeSync,
};
use grocer_core::{derive_status, DateRange, OrderQuery, SortKey, StatusFilter};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<PathBuf>,
    status: Option<String>,
    query: Option<String>,
    range: Option<String>,
    sort: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = parse_args() else {
        return Ok(());
    };

    init_tracing();

    let config = StorefrontConfig::load_or_default(args.config);
    let client = ApiClient::new(&config.api)?;

    // Theme preference lives next to the other app data.
    let local: Arc<dyn LocalThemeStore> = match config.theme.storage_path() {
        Some(path) => Arc::new(FileThemeStore::new(path)),
        None => Arc::new(MemoryThemeStore::default()),
    };
    let system_dark = env::var("GROCER_SYSTEM_DARK").is_ok_and(|v| v == "1" || v == "true");
    let (_system_tx, system_rx) = watch::channel(system_dark);
    let theme = ThemeSync::start(&config.theme, local, Arc::new(client.clone()), system_rx);

    let store = Storefront::new(client).with_theme(theme.clone());

    let email = env::var("GROCER_EMAIL").map_err(|_| "GROCER_EMAIL is not set")?;
    let password = env::var("GROCER_PASSWORD").map_err(|_| "GROCER_PASSWORD is not set")?;

    let user = match store.login(&email, &password).await {
        Ok(user) => user,
        Err(e) => {
            eprintln!("Sign-in failed: {}", e.user_message());
            return Err(e.into());
        }
    };

    if user.is_admin() {
        store.load_all_orders().await?;
    } else {
        store.load_orders().await?;
    }

    let mut query = OrderQuery::default().with_sort(config.orders.sort_key()?);
    if let Some(status) = &args.status {
        query = query.with_status(status.parse::<StatusFilter>()?);
    }
    if let Some(text) = args.query {
        query = query.with_text(text);
    }
    if let Some(range) = &args.range {
        query = query.with_date_range(range.parse::<DateRange>()?);
    }
    if let Some(sort) = &args.sort {
        query = query.with_sort(sort.parse::<SortKey>()?);
    }

    let orders = store.filtered_orders(&query).await;
    info!(count = orders.len(), sort = %query.sort, "Orders filtered");

    println!("Orders for {} ({} theme)", user.name, theme.current());
    println!("================================");
    for order in &orders {
        println!(
            "{:<24} {:<18} {:>12}  {}  {}",
            order.order_id.as_deref().unwrap_or(&order.id),
            derive_status(order).label(),
            order.total_or_zero().to_string(),
            order
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            order.product_name().unwrap_or(""),
        );
    }

    let summary = store.order_summary().await;
    println!();
    println!("{} shown of {} orders", orders.len(), summary.total_orders);
    println!("Revenue (excluding cancelled): {}", summary.revenue);
    for (status, count) in &summary.by_status {
        println!("  {:<18} {}", status.label(), count);
    }

    if let Err(e) = theme.shutdown().await {
        warn!(error = %e, "Theme sync did not shut down cleanly");
    }
    Ok(())
}

/// Parses command line flags. Returns `None` when help was printed.
fn parse_args() -> Option<Args> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        config: None,
        status: None,
        query: None,
        range: None,
        sort: None,
    };

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--config" | "-c" => {
                parsed.config = value.map(PathBuf::from);
                i += 1;
            }
            "--status" | "-s" => {
                parsed.status = value;
                i += 1;
            }
            "--query" | "-q" => {
                parsed.query = value;
                i += 1;
            }
            "--range" | "-r" => {
                parsed.range = value;
                i += 1;
            }
            "--sort" => {
                parsed.sort = value;
                i += 1;
            }
            "--help" | "-h" => {
                println!("Grocer storefront order viewer");
                println!();
                println!("Usage: storefront [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>   Config file (default: platform config dir)");
                println!("  -s, --status <KEY>    all, ordered, processing, shipped, delivered,");
                println!("                        cancelled, cash-on-delivery, pending");
                println!("  -q, --query <TEXT>    Match order number, product or customer");
                println!("  -r, --range <RANGE>   all, today, 7d, 30d, 90d, year");
                println!("      --sort <KEY>      date-desc, date-asc, price-asc, price-desc");
                println!("  -h, --help            Show this help message");
                println!();
                println!("Credentials come from GROCER_EMAIL and GROCER_PASSWORD.");
                return None;
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    Some(parsed)
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,grocer_client=debug,grocer_core=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
