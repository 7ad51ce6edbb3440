// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-process revisioned zone store
//!
//! Implements [`ResourceClient`] over a vector of zone documents with the
//! same contract the HTTP API offers: store-assigned ids, a revision token
//! that changes on every write, `Conflict` for stale tokens, and nested
//! environment/server operations that rewrite the owning zone.
//!
//! Used as the backend for tests and offline runs. Faults can be injected
//! per operation to exercise partial-failure paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::aggregate::{apply_edit, TreeEdit};
use crate::client::ResourceClient;
use crate::domain::{Environment, Server, Zone};
use crate::errors::{InventoryError, InventoryResult, ResourceKind};

/// Store operations, used to target injected faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListZones,
    GetZone,
    CreateZone,
    UpdateZone,
    DeleteZone,
    AddEnvironment,
    UpdateEnvironment,
    DeleteEnvironment,
    AddServer,
    UpdateServer,
    DeleteServer,
}

/// Document id the store assigns to a zone
pub fn zone_document_id(name: &str) -> String {
    format!("zone:{}", name)
}

/// Next revision token after `current`
///
/// Tokens look like `"{generation}-{opaque}"`; the generation starts at 1.
pub fn next_revision(current: Option<&str>) -> String {
    let generation = current
        .and_then(|rev| rev.split('-').next())
        .and_then(|g| g.parse::<u64>().ok())
        .unwrap_or(0);
    format!("{}-{}", generation + 1, Uuid::now_v7().simple())
}

/// Revisioned in-memory implementation of [`ResourceClient`]
#[derive(Default)]
pub struct InMemoryZoneStore {
    zones: RwLock<Vec<Zone>>,
    faults: Mutex<HashMap<StoreOp, InventoryError>>,
    writes: AtomicUsize,
}

impl InMemoryZoneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `op` fail with `error`
    pub async fn fail_next(&self, op: StoreOp, error: InventoryError) {
        self.faults.lock().await.insert(op, error);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current stored documents, in creation order
    pub async fn documents(&self) -> Vec<Zone> {
        self.zones.read().await.clone()
    }

    async fn check_fault(&self, op: StoreOp) -> InventoryResult<()> {
        match self.faults.lock().await.remove(&op) {
            Some(err) => {
                debug!("Injected fault for {:?}: {}", op, err);
                Err(err)
            }
            None => Ok(()),
        }
    }

    fn commit(&self, stored: &mut Zone, mut next: Zone) -> Zone {
        next.id = stored.id.clone();
        next.name = stored.name.clone();
        next.revision = Some(next_revision(stored.revision.as_deref()));
        *stored = next;
        self.writes.fetch_add(1, Ordering::SeqCst);
        stored.clone()
    }

    /// Server-side read-modify-write of one zone
    async fn edit(&self, op: StoreOp, zone: &str, edit: TreeEdit) -> InventoryResult<Zone> {
        self.check_fault(op).await?;
        let mut zones = self.zones.write().await;
        let stored = zones
            .iter_mut()
            .find(|z| z.name == zone)
            .ok_or_else(|| InventoryError::zone_not_found(zone))?;
        let next = apply_edit(stored, &edit)?;
        debug!("Store {} on zone {}", edit.label(), zone);
        Ok(self.commit(stored, next))
    }
}

#[async_trait]
impl ResourceClient for InMemoryZoneStore {
    async fn list_zones(&self) -> InventoryResult<Vec<Zone>> {
        self.check_fault(StoreOp::ListZones).await?;
        Ok(self.zones.read().await.clone())
    }

    async fn get_zone(&self, name: &str) -> InventoryResult<Zone> {
        self.check_fault(StoreOp::GetZone).await?;
        self.zones
            .read()
            .await
            .iter()
            .find(|z| z.name == name)
            .cloned()
            .ok_or_else(|| InventoryError::zone_not_found(name))
    }

    async fn create_zone(&self, zone: &Zone) -> InventoryResult<Zone> {
        self.check_fault(StoreOp::CreateZone).await?;
        let mut zones = self.zones.write().await;
        if zones.iter().any(|z| z.name == zone.name) {
            return Err(InventoryError::Duplicate {
                kind: ResourceKind::Zone,
                key: zone.name.clone(),
            });
        }

        let stored = Zone {
            id: Some(zone_document_id(&zone.name)),
            revision: Some(next_revision(None)),
            ..zone.clone()
        };
        zones.push(stored.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!("Store created zone {}", zone.name);
        Ok(stored)
    }

    async fn update_zone(&self, zone: &Zone) -> InventoryResult<Zone> {
        self.check_fault(StoreOp::UpdateZone).await?;
        let mut zones = self.zones.write().await;
        let stored = zones
            .iter_mut()
            .find(|z| z.name == zone.name)
            .ok_or_else(|| InventoryError::zone_not_found(&zone.name))?;

        if let Some(revision) = zone.revision.as_deref() {
            if stored.revision.as_deref() != Some(revision) {
                return Err(InventoryError::Conflict {
                    zone: zone.name.clone(),
                    message: format!(
                        "revision {} is stale, current is {}",
                        revision,
                        stored.revision.as_deref().unwrap_or("none")
                    ),
                });
            }
        }

        Ok(self.commit(stored, zone.clone()))
    }

    async fn delete_zone(&self, name: &str) -> InventoryResult<()> {
        self.check_fault(StoreOp::DeleteZone).await?;
        let mut zones = self.zones.write().await;
        let idx = zones
            .iter()
            .position(|z| z.name == name)
            .ok_or_else(|| InventoryError::zone_not_found(name))?;
        zones.remove(idx);
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!("Store deleted zone {}", name);
        Ok(())
    }

    async fn add_environment(&self, zone: &str, environment: &Environment) -> InventoryResult<Zone> {
        self.edit(
            StoreOp::AddEnvironment,
            zone,
            TreeEdit::AddEnvironment(environment.clone()),
        )
        .await
    }

    async fn update_environment(
        &self,
        zone: &str,
        env: &str,
        environment: &Environment,
    ) -> InventoryResult<Zone> {
        self.edit(
            StoreOp::UpdateEnvironment,
            zone,
            TreeEdit::ReplaceEnvironment {
                name: env.to_string(),
                environment: environment.clone(),
            },
        )
        .await
    }

    async fn delete_environment(&self, zone: &str, env: &str) -> InventoryResult<Zone> {
        self.edit(
            StoreOp::DeleteEnvironment,
            zone,
            TreeEdit::RemoveEnvironment {
                name: env.to_string(),
            },
        )
        .await
    }

    async fn add_server(&self, zone: &str, env: &str, server: &Server) -> InventoryResult<Zone> {
        self.edit(
            StoreOp::AddServer,
            zone,
            TreeEdit::AddServer {
                environment: env.to_string(),
                server: server.clone(),
            },
        )
        .await
    }

    async fn update_server(
        &self,
        zone: &str,
        env: &str,
        fqdn: &str,
        server: &Server,
    ) -> InventoryResult<Zone> {
        self.edit(
            StoreOp::UpdateServer,
            zone,
            TreeEdit::ReplaceServer {
                environment: env.to_string(),
                fqdn: fqdn.to_string(),
                server: server.clone(),
            },
        )
        .await
    }

    async fn delete_server(&self, zone: &str, env: &str, fqdn: &str) -> InventoryResult<Zone> {
        self.edit(
            StoreOp::DeleteServer,
            zone,
            TreeEdit::RemoveServer {
                environment: env.to_string(),
                fqdn: fqdn.to_string(),
            },
        )
        .await
    }
}
