// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone Repository
//!
//! Thin normalization layer over a [`ResourceClient`] and the only way the
//! synchronizer and batch tooling reach storage.
//!
//! # Failure Normalization
//!
//! - `get_zone` returns `None` on any failure, so "zone missing" and "lookup
//!   failed" are both "not available" to callers
//! - every other operation propagates failures unchanged
//!
//! The repository holds no cache. Logging for storage calls lives here.

use tracing::{debug, info, warn};

use crate::client::ResourceClient;
use crate::domain::{Environment, Server, Zone};
use crate::errors::InventoryResult;

/// Storage access point wrapping a [`ResourceClient`]
pub struct ZoneRepository<C: ResourceClient> {
    client: C,
}

impl<C: ResourceClient> ZoneRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The wrapped client, for callers that need the raw error contract
    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn list_zones(&self) -> InventoryResult<Vec<Zone>> {
        let zones = self
            .client
            .list_zones()
            .await
            .inspect_err(|e| warn!("Failed to list zones: {}", e))?;
        debug!("Listed {} zones", zones.len());
        Ok(zones)
    }

    /// Fetch a zone, or `None` if it is missing or the lookup failed
    pub async fn get_zone(&self, name: &str) -> Option<Zone> {
        match self.client.get_zone(name).await {
            Ok(zone) => Some(zone),
            Err(e) if e.is_not_found() => {
                debug!("Zone {} not found", name);
                None
            }
            Err(e) => {
                warn!("Failed to get zone {}: {}", name, e);
                None
            }
        }
    }

    pub async fn create_zone(&self, zone: &Zone) -> InventoryResult<Zone> {
        let created = self
            .client
            .create_zone(zone)
            .await
            .inspect_err(|e| warn!("Failed to create zone {}: {}", zone.name, e))?;
        info!("Created zone {}", created.name);
        Ok(created)
    }

    pub async fn update_zone(&self, zone: &Zone) -> InventoryResult<Zone> {
        let updated = self
            .client
            .update_zone(zone)
            .await
            .inspect_err(|e| warn!("Failed to update zone {}: {}", zone.name, e))?;
        info!(
            "Updated zone {} to revision {}",
            updated.name,
            updated.revision.as_deref().unwrap_or("-")
        );
        Ok(updated)
    }

    pub async fn delete_zone(&self, name: &str) -> InventoryResult<()> {
        self.client
            .delete_zone(name)
            .await
            .inspect_err(|e| warn!("Failed to delete zone {}: {}", name, e))?;
        info!("Deleted zone {}", name);
        Ok(())
    }

    pub async fn add_environment(&self, zone: &str, environment: &Environment) -> InventoryResult<Zone> {
        let updated = self
            .client
            .add_environment(zone, environment)
            .await
            .inspect_err(|e| warn!("Failed to add environment {}/{}: {}", zone, environment.name, e))?;
        info!("Added environment {}/{}", zone, environment.name);
        Ok(updated)
    }

    pub async fn update_environment(
        &self,
        zone: &str,
        env: &str,
        environment: &Environment,
    ) -> InventoryResult<Zone> {
        let updated = self
            .client
            .update_environment(zone, env, environment)
            .await
            .inspect_err(|e| warn!("Failed to update environment {}/{}: {}", zone, env, e))?;
        info!("Updated environment {}/{}", zone, env);
        Ok(updated)
    }

    pub async fn delete_environment(&self, zone: &str, env: &str) -> InventoryResult<Zone> {
        let updated = self
            .client
            .delete_environment(zone, env)
            .await
            .inspect_err(|e| warn!("Failed to delete environment {}/{}: {}", zone, env, e))?;
        info!("Deleted environment {}/{}", zone, env);
        Ok(updated)
    }

    pub async fn add_server(&self, zone: &str, env: &str, server: &Server) -> InventoryResult<Zone> {
        let updated = self
            .client
            .add_server(zone, env, server)
            .await
            .inspect_err(|e| warn!("Failed to add server {}/{}/{}: {}", zone, env, server.fqdn, e))?;
        info!("Added server {}/{}/{}", zone, env, server.fqdn);
        Ok(updated)
    }

    pub async fn update_server(
        &self,
        zone: &str,
        env: &str,
        fqdn: &str,
        server: &Server,
    ) -> InventoryResult<Zone> {
        let updated = self
            .client
            .update_server(zone, env, fqdn, server)
            .await
            .inspect_err(|e| warn!("Failed to update server {}/{}/{}: {}", zone, env, fqdn, e))?;
        info!("Updated server {}/{}/{}", zone, env, fqdn);
        Ok(updated)
    }

    pub async fn delete_server(&self, zone: &str, env: &str, fqdn: &str) -> InventoryResult<Zone> {
        let updated = self
            .client
            .delete_server(zone, env, fqdn)
            .await
            .inspect_err(|e| warn!("Failed to delete server {}/{}/{}: {}", zone, env, fqdn, e))?;
        info!("Deleted server {}/{}/{}", zone, env, fqdn);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InventoryError;
    use crate::store::{InMemoryZoneStore, StoreOp};

    #[tokio::test]
    async fn test_get_zone_absorbs_not_found() {
        let repo = ZoneRepository::new(InMemoryZoneStore::new());
        assert!(repo.get_zone("missing").await.is_none());
        assert!(repo.client().get_zone("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_zone_absorbs_transport_failure() {
        let repo = ZoneRepository::new(InMemoryZoneStore::new());
        repo.create_zone(&Zone::new("core")).await.unwrap();
        repo.client()
            .fail_next(
                StoreOp::GetZone,
                InventoryError::Transport {
                    status: Some(500),
                    message: "boom".to_string(),
                },
            )
            .await;

        assert!(repo.get_zone("core").await.is_none());
        assert!(repo.get_zone("core").await.is_some());
    }

    #[tokio::test]
    async fn test_other_operations_propagate() {
        let repo = ZoneRepository::new(InMemoryZoneStore::new());
        let err = repo.delete_zone("missing").await.unwrap_err();
        assert_eq!(err, InventoryError::zone_not_found("missing"));

        repo.client()
            .fail_next(
                StoreOp::ListZones,
                InventoryError::Transport {
                    status: None,
                    message: "down".to_string(),
                },
            )
            .await;
        assert!(matches!(
            repo.list_zones().await,
            Err(InventoryError::Transport { .. })
        ));
    }
}
