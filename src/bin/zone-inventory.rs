// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone Inventory CLI
//!
//! Browse and edit the zone inventory through the HTTP document API.
//!
//! # Commands
//!
//! - `list` - List zones with their environment and server counts
//! - `show` - Print one zone's environments and servers
//! - `export` - Write the whole tree to a JSON snapshot
//! - `import` - Recreate a JSON snapshot in the store
//! - `add-zone` - Create an empty zone
//! - `delete-zone` - Delete a zone and everything in it
//! - `clear` - Delete every zone
//! - `seed` - Create generated zones, environments and servers
//!
//! Configuration comes from the environment:
//! 1. `INVENTORY_API_URL` (default: http://localhost:8000)
//! 2. `INVENTORY_API_TOKEN` (optional bearer token)
//! 3. `INVENTORY_TIMEOUT_SECS` (default: 30)

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zone_inventory::batch::{
    clear_all, export_snapshot, import_snapshot, read_snapshot, write_snapshot, ImportReport,
    SeedPlan,
};
use zone_inventory::{ClientConfig, HttpResourceClient, StaticToken, TreeSynchronizer, Zone};

/// Zone inventory command-line tool.
#[derive(Parser)]
#[command(name = "zone-inventory")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List zones
    List,

    /// Show one zone's environments and servers
    Show {
        /// Zone name
        zone: String,
    },

    /// Export every zone to a JSON snapshot
    Export {
        /// Output file
        file: PathBuf,
    },

    /// Import a JSON snapshot
    Import {
        /// Snapshot file
        file: PathBuf,
    },

    /// Create an empty zone
    AddZone {
        /// Zone name
        name: String,
    },

    /// Delete a zone and everything in it
    DeleteZone {
        /// Zone name
        name: String,
    },

    /// Delete every zone
    Clear {
        /// Required to actually delete
        #[arg(long)]
        yes: bool,
    },

    /// Create generated test data
    Seed {
        /// Zones to create
        #[arg(short, long, value_delimiter = ',', default_value = "prod,uat,qa")]
        zones: Vec<String>,

        /// Environments per zone
        #[arg(short, long, default_value = "3")]
        environments: usize,

        /// Servers per environment
        #[arg(short, long, default_value = "5")]
        servers: usize,
    },
}

fn connect() -> Result<TreeSynchronizer<HttpResourceClient>> {
    let config = ClientConfig::from_env().context("Invalid inventory configuration")?;
    let credentials = match config.api_token.clone() {
        Some(token) => StaticToken::new(token),
        None => StaticToken::none(),
    };
    info!("Using inventory API at {}", config.api_root());

    let client = HttpResourceClient::new(config, Arc::new(credentials))
        .context("Failed to create inventory client")?;
    Ok(TreeSynchronizer::from_client(client))
}

/// Print per-level counts and log each failure
fn print_import_report(report: &ImportReport) {
    println!(
        "Zones: {} created, {} failed",
        report.zones.succeeded(),
        report.zones.failed()
    );
    println!(
        "Environments: {} created, {} failed",
        report.environments.succeeded(),
        report.environments.failed()
    );
    println!(
        "Servers: {} created, {} failed",
        report.servers.succeeded(),
        report.servers.failed()
    );
    for (key, err) in report
        .zones
        .failures()
        .chain(report.environments.failures())
        .chain(report.servers.failures())
    {
        warn!("{}: {}", key, err);
    }
}

fn print_zone(zone: &Zone) {
    println!("{}", zone.name);
    for environment in &zone.environments {
        println!("  {}", environment.name);
        for server in &environment.servers {
            println!(
                "    {:<40} {:<16} {:<12} {}",
                server.fqdn,
                server.ip,
                server.status.to_string(),
                server.server_type
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut sync = connect()?;

    match cli.command {
        Commands::List => {
            sync.refresh().await.context("Failed to list zones")?;
            for zone in sync.zones() {
                println!(
                    "{:<24} {:>3} environments {:>4} servers",
                    zone.name,
                    zone.environments.len(),
                    zone.server_count()
                );
            }
        }
        Commands::Show { zone } => {
            sync.select_zone(&zone)
                .await
                .with_context(|| format!("Failed to load zone {}", zone))?;
            if let Some(selected) = sync.selected_zone() {
                print_zone(selected);
            }
        }
        Commands::Export { file } => {
            let snapshot = export_snapshot(sync.repository(), Utc::now())
                .await
                .context("Failed to read inventory")?;
            write_snapshot(&file, &snapshot)
                .await
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("Exported {} zones to {}", snapshot.zones.len(), file.display());
        }
        Commands::Import { file } => {
            let snapshot = read_snapshot(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = import_snapshot(sync.repository(), &snapshot).await;
            print_import_report(&report);

            if !report.is_success() {
                anyhow::bail!("Import of {} finished with failures", file.display());
            }
        }
        Commands::AddZone { name } => {
            let zone = sync
                .create_zone(Zone::new(name.clone()))
                .await
                .with_context(|| format!("Failed to create zone {}", name))?;
            println!("Created zone {}", zone.name);
        }
        Commands::DeleteZone { name } => {
            sync.delete_zone(&name)
                .await
                .with_context(|| format!("Failed to delete zone {}", name))?;
            println!("Deleted zone {}", name);
        }
        Commands::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete every zone without --yes");
            }
            let report = clear_all(sync.repository())
                .await
                .context("Failed to list zones")?;
            for (zone, err) in report.failures() {
                warn!("{}: {}", zone, err);
            }
            println!("Deleted {} zones, {} failed", report.succeeded(), report.failed());
            if !report.is_success() {
                anyhow::bail!("Clear finished with failures");
            }
        }
        Commands::Seed {
            zones,
            environments,
            servers,
        } => {
            let plan = SeedPlan {
                zones,
                environments_per_zone: environments,
                servers_per_environment: servers,
            };
            let report = import_snapshot(sync.repository(), &plan.snapshot()).await;
            print_import_report(&report);
            if !report.is_success() {
                anyhow::bail!("Seeding finished with failures");
            }
        }
    }

    Ok(())
}
