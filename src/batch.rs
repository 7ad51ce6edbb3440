// Copyright (c) 2025 - Cowboy AI, Inc.
//! Batch Operations and Snapshots
//!
//! Bulk creation of zones, environments and servers, JSON import/export of
//! the whole tree, clearing the store, and generated test data. Every item is an independent call; failures are
//! recorded per key and never stop the rest of the batch.
//!
//! # Snapshot Format
//!
//! ```json
//! {
//!   "exported_at": "2026-01-19T12:00:00Z",   (optional)
//!   "zones": [ { "name": "core", "type": "zone", "environments": [ ... ] } ]
//! }
//! ```
//!
//! # Time Handling
//!
//! The export timestamp is passed in by the caller.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::client::ResourceClient;
use crate::domain::{Environment, Server, ServerStatus, Zone};
use crate::errors::{InventoryError, InventoryResult};
use crate::repository::ZoneRepository;

/// Per-key outcomes of a batch, in submission order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    outcomes: Vec<(String, InventoryResult<()>)>,
}

impl BatchReport {
    pub fn record(&mut self, key: impl Into<String>, result: InventoryResult<()>) {
        self.outcomes.push((key.into(), result));
    }

    pub fn outcome(&self, key: &str) -> Option<&InventoryResult<()>> {
        self.outcomes.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &InventoryError)> {
        self.outcomes
            .iter()
            .filter_map(|(k, r)| r.as_ref().err().map(|e| (k.as_str(), e)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Outcomes of a snapshot import, one report per tree level
///
/// Keys are `zone`, `zone/env` and `zone/env/fqdn`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub zones: BatchReport,
    pub environments: BatchReport,
    pub servers: BatchReport,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.zones.is_success() && self.environments.is_success() && self.servers.is_success()
    }
}

/// The whole tree at a point in time
///
/// Files holding only `{"zones": [...]}` are accepted; their export time is
/// unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub zones: Vec<Zone>,
}

/// Create zones; independent zones are created concurrently
pub async fn batch_create_zones<C: ResourceClient>(
    repo: &ZoneRepository<C>,
    zones: &[Zone],
) -> BatchReport {
    let results = join_all(zones.iter().map(|zone| repo.create_zone(zone))).await;

    let mut report = BatchReport::default();
    for (zone, result) in zones.iter().zip(results) {
        report.record(zone.name.clone(), result.map(|_| ()));
    }
    report
}

/// Add environments to one zone, in order
pub async fn batch_create_environments<C: ResourceClient>(
    repo: &ZoneRepository<C>,
    zone: &str,
    environments: &[Environment],
) -> BatchReport {
    let mut report = BatchReport::default();
    for environment in environments {
        let result = repo.add_environment(zone, environment).await.map(|_| ());
        report.record(environment.name.clone(), result);
    }
    report
}

/// Add servers to one environment, in order
pub async fn batch_add_servers<C: ResourceClient>(
    repo: &ZoneRepository<C>,
    zone: &str,
    env: &str,
    servers: &[Server],
) -> BatchReport {
    let mut report = BatchReport::default();
    for server in servers {
        let result = repo.add_server(zone, env, server).await.map(|_| ());
        report.record(server.fqdn.clone(), result);
    }
    report
}

/// Read every zone into a snapshot, without store identity
pub async fn export_snapshot<C: ResourceClient>(
    repo: &ZoneRepository<C>,
    exported_at: DateTime<Utc>,
) -> InventoryResult<InventorySnapshot> {
    let zones = repo
        .list_zones()
        .await?
        .iter()
        .map(Zone::detached)
        .collect::<Vec<_>>();
    info!("Exported {} zones", zones.len());
    Ok(InventorySnapshot {
        exported_at: Some(exported_at),
        zones,
    })
}

/// Recreate a snapshot level by level
///
/// Each zone is created empty, then its environments are added empty, then
/// their servers. Children of a zone or environment that could not be
/// created are skipped and reported as failed.
pub async fn import_snapshot<C: ResourceClient>(
    repo: &ZoneRepository<C>,
    snapshot: &InventorySnapshot,
) -> ImportReport {
    let mut report = ImportReport::default();

    for zone in &snapshot.zones {
        let empty = Zone {
            zone_type: zone.zone_type.clone(),
            ..Zone::new(zone.name.clone())
        };
        let created = repo.create_zone(&empty).await.map(|_| ());
        let zone_ok = created.is_ok();
        report.zones.record(zone.name.clone(), created);

        for environment in &zone.environments {
            let env_key = format!("{}/{}", zone.name, environment.name);
            let added = if zone_ok {
                repo.add_environment(&zone.name, &Environment::new(environment.name.clone()))
                    .await
                    .map(|_| ())
            } else {
                Err(skipped(&zone.name))
            };
            let env_ok = added.is_ok();
            report.environments.record(env_key.clone(), added);

            for server in &environment.servers {
                let result = if env_ok {
                    repo.add_server(&zone.name, &environment.name, server)
                        .await
                        .map(|_| ())
                } else {
                    Err(skipped(&env_key))
                };
                report
                    .servers
                    .record(format!("{}/{}", env_key, server.fqdn), result);
            }
        }
    }

    if !report.is_success() {
        warn!(
            "Import finished with {} zone, {} environment and {} server failures",
            report.zones.failed(),
            report.environments.failed(),
            report.servers.failed()
        );
    }
    report
}

/// Delete every zone; one outcome per zone name
pub async fn clear_all<C: ResourceClient>(repo: &ZoneRepository<C>) -> InventoryResult<BatchReport> {
    let zones = repo.list_zones().await?;
    let mut report = BatchReport::default();
    for zone in &zones {
        report.record(zone.name.clone(), repo.delete_zone(&zone.name).await);
    }
    info!("Cleared {} of {} zones", report.succeeded(), zones.len());
    Ok(report)
}

const SEED_SERVER_TYPES: [&str; 5] = ["application", "database", "web", "cache", "auth"];

/// Shape of generated test data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub zones: Vec<String>,
    pub environments_per_zone: usize,
    pub servers_per_environment: usize,
}

impl SeedPlan {
    /// Build the tree described by the plan
    ///
    /// Output is deterministic: environments are `env-{n}`, servers are
    /// `server-{zone}-{env}-{n}.example.com` with addresses in `10.0.0.0/8`,
    /// alternating status and cycling server types.
    pub fn snapshot(&self) -> InventorySnapshot {
        let zones = self
            .zones
            .iter()
            .enumerate()
            .map(|(zi, zone)| {
                let environments = (0..self.environments_per_zone)
                    .map(|ei| {
                        let env = format!("env-{}", ei);
                        let servers = (0..self.servers_per_environment)
                            .map(|si| {
                                let status = if si % 2 == 0 {
                                    ServerStatus::Available
                                } else {
                                    ServerStatus::Unavailable
                                };
                                Server::new(
                                    format!("server-{}-{}-{}.example.com", zone, env, si),
                                    format!("10.{}.{}.{}", zi % 256, ei % 256, si % 254 + 1),
                                    status,
                                    SEED_SERVER_TYPES[si % SEED_SERVER_TYPES.len()],
                                )
                            })
                            .collect();
                        Environment::new(env).with_servers(servers)
                    })
                    .collect();
                Zone::new(zone.clone()).with_environments(environments)
            })
            .collect();

        InventorySnapshot {
            exported_at: None,
            zones,
        }
    }
}

fn skipped(parent: &str) -> InventoryError {
    InventoryError::Precondition(format!("{} was not created", parent))
}

/// Load a snapshot from a JSON file
pub async fn read_snapshot(path: impl AsRef<Path>) -> InventoryResult<InventorySnapshot> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write a snapshot as pretty-printed JSON
pub async fn write_snapshot(path: impl AsRef<Path>, snapshot: &InventorySnapshot) -> InventoryResult<()> {
    let json = serde_json::to_vec_pretty(snapshot)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
