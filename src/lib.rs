// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone inventory synchronization
//!
//! Browse and edit a three-level inventory tree (Zone → Environment →
//! Server) stored as revisioned zone documents behind an HTTP API, while
//! keeping a client-side copy of the tree and a single selected
//! zone/environment consistent with the store.
//!
//! # Layers
//!
//! - [`client`] - typed request/response mapping onto the document API
//! - [`repository`] - failure normalization and logging over a client
//! - [`sync`] - the cached tree, selection and read-modify-write commands
//! - [`batch`] - bulk operations and JSON snapshots
//! - [`store`] - in-process revisioned store with the API's semantics

pub mod aggregate;
pub mod batch;
pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use client::{CredentialProvider, HttpResourceClient, ResourceClient, StaticToken};
pub use config::ClientConfig;
pub use domain::{Environment, Selection, Server, ServerStatus, Zone};
pub use errors::{InventoryError, InventoryResult, ResourceKind};
pub use repository::ZoneRepository;
pub use store::InMemoryZoneStore;
pub use sync::{SyncStatus, TreeState, TreeSynchronizer};
