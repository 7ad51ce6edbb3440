// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tree Synchronizer
//!
//! Owns the cached zone tree and the selection, and implements every mutation
//! as a transaction:
//!
//! 1. Fetch the owning zone through the repository
//! 2. Apply the edit (pure function)
//! 3. Write the whole zone back, carrying the revision that was read
//! 4. Reload the full tree
//! 5. Re-resolve the selection by name against the fresh tree
//!
//! If any step fails the command fails as a whole: nothing local changes
//! until step 4 succeeds, and the error is recorded in
//! [`TreeState::last_error`]. There are no retries.
//!
//! # Concurrency
//!
//! Commands take `&mut self`, so one synchronizer runs one command at a
//! time. Callers that share a synchronizer put it behind a
//! `tokio::sync::Mutex`, which applies commands in issue order. Across
//! processes the store's revision check is the only guard against lost
//! updates.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::aggregate::{apply_edit, TreeEdit};
use crate::client::ResourceClient;
use crate::domain::{Environment, Selection, Server, Zone};
use crate::errors::{InventoryError, InventoryResult};
use crate::repository::ZoneRepository;
use crate::sync::state::{SyncStatus, TreeState};

/// Coordinator for the cached tree and selection
pub struct TreeSynchronizer<C: ResourceClient> {
    repository: ZoneRepository<C>,
    state: TreeState,
    publisher: watch::Sender<TreeState>,
}

impl<C: ResourceClient> TreeSynchronizer<C> {
    pub fn new(repository: ZoneRepository<C>) -> Self {
        let (publisher, _) = watch::channel(TreeState::default());
        Self {
            repository,
            state: TreeState::default(),
            publisher,
        }
    }

    pub fn from_client(client: C) -> Self {
        Self::new(ZoneRepository::new(client))
    }

    pub fn repository(&self) -> &ZoneRepository<C> {
        &self.repository
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn zones(&self) -> &[Zone] {
        &self.state.zones
    }

    pub fn selected_zone(&self) -> Option<&Zone> {
        self.state.selected_zone()
    }

    pub fn selected_environment(&self) -> Option<&Environment> {
        self.state.selected_environment()
    }

    pub fn status(&self) -> SyncStatus {
        self.state.status
    }

    pub fn last_error(&self) -> Option<&InventoryError> {
        self.state.last_error.as_ref()
    }

    /// Receive a copy of the state after every change
    pub fn subscribe(&self) -> watch::Receiver<TreeState> {
        self.publisher.subscribe()
    }

    pub fn clear_error(&mut self) {
        self.state.last_error = None;
        self.publish();
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Reload every zone and drop the selection
    pub async fn refresh(&mut self) -> InventoryResult<()> {
        self.begin();
        let result = self.reload().await;
        self.finish(result)
    }

    /// Select a zone by fetching it fresh from the store
    pub async fn select_zone(&mut self, name: &str) -> InventoryResult<()> {
        self.begin();
        let result = match self.repository.get_zone(name).await {
            Some(zone) => {
                debug!("Selected zone {}", zone.name);
                self.state.selection = Selection::zone(zone);
                Ok(())
            }
            None => Err(InventoryError::zone_not_found(name)),
        };
        self.finish(result)
    }

    /// Focus an environment of the selected zone
    pub fn select_environment(&mut self, name: &str) -> InventoryResult<()> {
        let Some(zone) = self.state.selection.zone_name().map(str::to_string) else {
            return self.fail(InventoryError::Precondition(
                "select a zone before selecting an environment".to_string(),
            ));
        };

        if self.state.selection.focus_environment(name) {
            self.state.last_error = None;
            self.publish();
            Ok(())
        } else {
            self.fail(InventoryError::environment_not_found(&zone, name))
        }
    }

    pub async fn create_zone(&mut self, zone: Zone) -> InventoryResult<Zone> {
        self.begin();
        let result = self.write_create_zone(zone).await;
        self.finish(result)
    }

    /// Replace a zone document; the zone's revision is checked by the store
    pub async fn update_zone(&mut self, zone: Zone) -> InventoryResult<Zone> {
        self.begin();
        let result = self.write_update_zone(zone).await;
        self.finish(result)
    }

    pub async fn delete_zone(&mut self, name: &str) -> InventoryResult<()> {
        self.begin();
        let result = self.write_delete_zone(name).await;
        self.finish(result)
    }

    pub async fn create_environment(
        &mut self,
        zone: &str,
        environment: Environment,
    ) -> InventoryResult<Zone> {
        self.edit(zone, TreeEdit::AddEnvironment(environment)).await
    }

    pub async fn update_environment(
        &mut self,
        zone: &str,
        env: &str,
        environment: Environment,
    ) -> InventoryResult<Zone> {
        let edit = TreeEdit::ReplaceEnvironment {
            name: env.to_string(),
            environment,
        };
        self.edit(zone, edit).await
    }

    pub async fn delete_environment(&mut self, zone: &str, env: &str) -> InventoryResult<Zone> {
        let edit = TreeEdit::RemoveEnvironment {
            name: env.to_string(),
        };
        self.edit(zone, edit).await
    }

    pub async fn add_server(&mut self, zone: &str, env: &str, server: Server) -> InventoryResult<Zone> {
        let edit = TreeEdit::AddServer {
            environment: env.to_string(),
            server,
        };
        self.edit(zone, edit).await
    }

    pub async fn update_server(
        &mut self,
        zone: &str,
        env: &str,
        fqdn: &str,
        server: Server,
    ) -> InventoryResult<Zone> {
        let edit = TreeEdit::ReplaceServer {
            environment: env.to_string(),
            fqdn: fqdn.to_string(),
            server,
        };
        self.edit(zone, edit).await
    }

    pub async fn delete_server(&mut self, zone: &str, env: &str, fqdn: &str) -> InventoryResult<Zone> {
        let edit = TreeEdit::RemoveServer {
            environment: env.to_string(),
            fqdn: fqdn.to_string(),
        };
        self.edit(zone, edit).await
    }

    // ------------------------------------------------------------------
    // Transaction steps
    // ------------------------------------------------------------------

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }

    fn begin(&mut self) {
        self.state.status = SyncStatus::Loading;
        self.state.last_error = None;
        self.publish();
    }

    fn finish<T>(&mut self, result: InventoryResult<T>) -> InventoryResult<T> {
        self.state.status = SyncStatus::Idle;
        if let Err(e) = &result {
            warn!("Inventory command failed: {}", e);
            self.state.last_error = Some(e.clone());
        }
        self.publish();
        result
    }

    fn fail<T>(&mut self, error: InventoryError) -> InventoryResult<T> {
        self.finish(Err(error))
    }

    /// Replace the cached tree; the selection is dropped with it
    async fn reload(&mut self) -> InventoryResult<()> {
        let zones = self.repository.list_zones().await?;
        self.state.zones = zones;
        self.state.selection = Selection::empty();
        Ok(())
    }

    /// Authoritative copy of a zone after a reload, falling back to the
    /// document returned by the write
    fn authoritative(&self, written: Zone) -> Zone {
        self.state
            .zone(&written.name)
            .cloned()
            .unwrap_or(written)
    }

    async fn write_create_zone(&mut self, zone: Zone) -> InventoryResult<Zone> {
        let created = self.repository.create_zone(&zone).await?;
        self.reload().await?;
        Ok(self.authoritative(created))
    }

    async fn write_update_zone(&mut self, zone: Zone) -> InventoryResult<Zone> {
        let prior = self.state.selection.clone();
        let updated = self.repository.update_zone(&zone).await?;
        self.reload().await?;

        let updated = self.authoritative(updated);
        if prior.is_zone(&updated.name) {
            self.state.selection = Selection::zone(updated.clone());
        }
        Ok(updated)
    }

    async fn write_delete_zone(&mut self, name: &str) -> InventoryResult<()> {
        self.repository.delete_zone(name).await?;
        self.reload().await
    }

    async fn edit(&mut self, zone: &str, edit: TreeEdit) -> InventoryResult<Zone> {
        self.begin();
        let result = self.read_modify_write(zone, edit).await;
        self.finish(result)
    }

    async fn read_modify_write(&mut self, zone_name: &str, edit: TreeEdit) -> InventoryResult<Zone> {
        let prior = self.state.selection.clone();

        let current = self
            .repository
            .get_zone(zone_name)
            .await
            .ok_or_else(|| InventoryError::zone_not_found(zone_name))?;
        let next = apply_edit(&current, &edit)?;
        let written = self.repository.update_zone(&next).await?;
        info!("Applied {} to zone {}", edit.label(), zone_name);

        self.reload().await?;

        let zone = self.authoritative(written);
        if prior.is_zone(zone_name) {
            let environment = restored_environment(&prior, &edit);
            self.state.selection = Selection::resolve(zone.clone(), environment.as_deref());
        }
        Ok(zone)
    }
}

/// Environment name to re-select after `edit`, given the prior selection
///
/// Environment edits keep whatever environment was focused (following a
/// rename). Server edits keep it only if they touched that environment.
fn restored_environment(prior: &Selection, edit: &TreeEdit) -> Option<String> {
    let focused = prior.environment_name()?;
    match edit {
        TreeEdit::ReplaceEnvironment { name, environment } if name == focused => {
            Some(environment.name.clone())
        }
        TreeEdit::AddEnvironment(_)
        | TreeEdit::ReplaceEnvironment { .. }
        | TreeEdit::RemoveEnvironment { .. } => Some(focused.to_string()),
        TreeEdit::AddServer { .. }
        | TreeEdit::ReplaceServer { .. }
        | TreeEdit::RemoveServer { .. } => {
            (edit.environment_name() == focused).then(|| focused.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ServerStatus;
    use crate::store::{InMemoryZoneStore, StoreOp};
    use pretty_assertions::assert_eq;

    fn server(fqdn: &str) -> Server {
        Server::new(fqdn, "10.0.0.1", ServerStatus::Available, "web")
    }

    async fn seeded() -> TreeSynchronizer<InMemoryZoneStore> {
        let store = InMemoryZoneStore::new();
        store.create_zone(&Zone::new("core")).await.unwrap();
        store.add_environment("core", &Environment::new("dev")).await.unwrap();
        store.add_environment("core", &Environment::new("prod")).await.unwrap();
        store.add_server("core", "prod", &server("web01.example.com")).await.unwrap();
        store.create_zone(&Zone::new("edge")).await.unwrap();

        let mut sync = TreeSynchronizer::from_client(store);
        sync.refresh().await.unwrap();
        sync
    }

    #[test]
    fn test_restored_environment_follows_rename() {
        let zone = Zone::new("core").with_environments(vec![Environment::new("dev")]);
        let prior = Selection::resolve(zone, Some("dev"));

        let rename = TreeEdit::ReplaceEnvironment {
            name: "dev".to_string(),
            environment: Environment::new("development"),
        };
        assert_eq!(
            restored_environment(&prior, &rename).as_deref(),
            Some("development")
        );

        let other_env_server = TreeEdit::AddServer {
            environment: "prod".to_string(),
            server: server("x.example.com"),
        };
        assert_eq!(restored_environment(&prior, &other_env_server), None);
    }

    #[tokio::test]
    async fn test_refresh_clears_selection() {
        let mut sync = seeded().await;
        sync.select_zone("core").await.unwrap();
        sync.select_environment("prod").unwrap();

        sync.refresh().await.unwrap();

        assert_eq!(sync.zones().len(), 2);
        assert!(sync.selected_zone().is_none());
        assert!(sync.selected_environment().is_none());
        assert_eq!(sync.status(), SyncStatus::Idle);
    }

    #[tokio::test]
    async fn test_select_environment_without_zone_is_precondition() {
        let mut sync = seeded().await;
        let err = sync.select_environment("prod").unwrap_err();
        assert!(matches!(err, InventoryError::Precondition(_)));
        assert_eq!(sync.last_error(), Some(&err));
        assert!(sync.selected_environment().is_none());
    }

    #[tokio::test]
    async fn test_select_missing_zone_keeps_selection() {
        let mut sync = seeded().await;
        sync.select_zone("core").await.unwrap();

        let err = sync.select_zone("missing").await.unwrap_err();

        assert_eq!(err, InventoryError::zone_not_found("missing"));
        assert_eq!(sync.selected_zone().unwrap().name, "core");
        assert_eq!(sync.last_error(), Some(&err));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_untouched() {
        let mut sync = seeded().await;
        sync.select_zone("core").await.unwrap();
        sync.select_environment("prod").unwrap();
        let before = sync.state().clone();

        sync.repository()
            .client()
            .fail_next(
                StoreOp::UpdateZone,
                InventoryError::Transport {
                    status: Some(502),
                    message: "bad gateway".to_string(),
                },
            )
            .await;
        let err = sync
            .add_server("core", "prod", server("web02.example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, InventoryError::Transport { .. }));
        assert_eq!(sync.zones(), before.zones.as_slice());
        assert_eq!(sync.state().selection, before.selection);
        assert_eq!(sync.last_error(), Some(&err));
    }

    #[tokio::test]
    async fn test_failed_refresh_after_write_keeps_local_state() {
        let mut sync = seeded().await;
        let before = sync.zones().to_vec();

        sync.repository()
            .client()
            .fail_next(
                StoreOp::ListZones,
                InventoryError::Transport {
                    status: None,
                    message: "timeout".to_string(),
                },
            )
            .await;
        let result = sync.create_environment("edge", Environment::new("qa")).await;

        assert!(result.is_err());
        assert_eq!(sync.zones(), before.as_slice());
        // The write itself landed in the store
        let stored = sync.repository().get_zone("edge").await.unwrap();
        assert!(stored.environment("qa").is_some());
    }

    #[tokio::test]
    async fn test_subscribers_see_idle_state_after_command() {
        let mut sync = seeded().await;
        let mut rx = sync.subscribe();

        sync.select_zone("edge").await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.status, SyncStatus::Idle);
        assert_eq!(state.selected_zone().unwrap().name, "edge");
    }

    #[tokio::test]
    async fn test_next_command_clears_last_error() {
        let mut sync = seeded().await;
        assert!(sync.select_zone("missing").await.is_err());
        assert!(sync.last_error().is_some());

        sync.refresh().await.unwrap();
        assert!(sync.last_error().is_none());
    }
}
