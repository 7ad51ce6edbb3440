// Copyright (c) 2025 - Cowboy AI, Inc.
//! Published synchronizer state

use crate::domain::{Environment, Selection, Zone};
use crate::errors::InventoryError;

/// Whether a command is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
}

/// Snapshot of the cached tree, the selection and command status
///
/// This is what consumers render from. A fresh copy is published after every
/// state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeState {
    /// Zones as of the last successful refresh, in store order
    pub zones: Vec<Zone>,

    pub selection: Selection,

    pub status: SyncStatus,

    /// Failure of the most recent command, cleared when the next one starts
    pub last_error: Option<InventoryError>,
}

impl TreeState {
    pub fn selected_zone(&self) -> Option<&Zone> {
        self.selection.selected_zone()
    }

    pub fn selected_environment(&self) -> Option<&Environment> {
        self.selection.selected_environment()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SyncStatus::Loading
    }

    /// Cached zone by name
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }
}
