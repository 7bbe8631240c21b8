// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use dnsync::{
    adapters::{InventoryCloud, JsonFileStore, MemoryStore},
    context::Context,
    event::LifecycleEvent,
    metrics,
    providers::RegistrationStore,
    reconcilers::{handle_event, EventOutcome},
    settings::Settings,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Synchronize DNS records for one instance lifecycle event.
#[derive(Parser, Debug)]
#[command(name = "dnsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Lifecycle event JSON file
    event: PathBuf,

    /// Inventory document (YAML or JSON) describing accounts, instances and zones
    #[arg(long, env = "DNSYNC_INVENTORY")]
    inventory: PathBuf,

    /// Directory holding the registration table; kept in memory when unset
    #[arg(long, env = "DNSYNC_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// Print metrics in Prometheus text format before exiting
    #[arg(long)]
    print_metrics: bool,

    #[command(flatten)]
    settings: Settings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .thread_name("dnsync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_logging() {
    // Respects RUST_LOG, defaulting to INFO, and RUST_LOG_FORMAT=json|text
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_logging();
    info!(event = %cli.event.display(), "Starting dnsync");

    let payload = tokio::fs::read_to_string(&cli.event)
        .await
        .with_context(|| format!("Failed to read event file {}", cli.event.display()))?;
    let event = LifecycleEvent::from_json(&payload)?;

    let cloud = InventoryCloud::load(&cli.inventory).await?;
    debug!(inventory = %cli.inventory.display(), "Inventory loaded");

    let store: Arc<dyn RegistrationStore> = match &cli.store_dir {
        Some(dir) => {
            let store = JsonFileStore::new(dir, &cli.settings.table_name);
            debug!(path = %store.path().display(), "Using file registration store");
            Arc::new(store)
        }
        None => {
            debug!("Using in-memory registration store");
            Arc::new(MemoryStore::new())
        }
    };

    let ctx = Context::new(
        cli.settings,
        Arc::new(cloud.clone()),
        Arc::new(cloud),
        store,
    );

    let result = handle_event(&ctx, &event).await;

    if cli.print_metrics {
        println!("{}", metrics::gather_metrics()?);
    }

    match result? {
        EventOutcome::Registered {
            instance_id,
            records,
        } => {
            info!(instance_id = %instance_id, records = records.len(), "Registration complete");
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        EventOutcome::Unregistered {
            instance_id,
            summary,
        } => info!(
            instance_id = %instance_id,
            removed = summary.removed,
            failed = summary.failed,
            "Unregistration complete"
        ),
        EventOutcome::AccountDisabled { account_id } => {
            info!(account_id = %account_id, "Account is not enabled - nothing done");
        }
        EventOutcome::Ignored { state } => info!(state = %state, "Nothing to do"),
    }
    Ok(())
}
