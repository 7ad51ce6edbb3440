// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tree Synchronization
//!
//! Keeps a client-side copy of the zone tree and a single selected
//! zone/environment consistent with the store.
//!
//! # Architecture
//!
//! ```text
//! Consumer command
//!     ↓
//! TreeSynchronizer (this module)
//!     ↓
//! ZoneRepository → ResourceClient → document store
//!     ↓
//! full reload → selection re-resolved by name
//!     ↓
//! TreeState published (watch channel) → Consumer re-renders
//! ```
//!
//! # Example
//!
//! ```rust
//! use zone_inventory::domain::{Environment, Zone};
//! use zone_inventory::store::InMemoryZoneStore;
//! use zone_inventory::sync::TreeSynchronizer;
//!
//! # tokio_test::block_on(async {
//! let mut sync = TreeSynchronizer::from_client(InMemoryZoneStore::new());
//! sync.create_zone(Zone::new("core")).await?;
//! sync.select_zone("core").await?;
//! sync.create_environment("core", Environment::new("prod")).await?;
//!
//! assert_eq!(sync.selected_zone().unwrap().environments.len(), 1);
//! # Ok::<(), zone_inventory::InventoryError>(())
//! # }).unwrap();
//! ```

pub mod state;
pub mod synchronizer;

pub use state::{SyncStatus, TreeState};
pub use synchronizer::TreeSynchronizer;
