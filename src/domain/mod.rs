// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Domain Models
//!
//! The three-level inventory tree and the consumer-side selection.
//!
//! # Documents
//!
//! - [`Zone`] - Root aggregate; the unit of storage
//! - [`Environment`] - Named server collection, unique by name within a zone
//! - [`Server`] - Leaf record, unique by fqdn within an environment
//!
//! # Selection
//!
//! - [`Selection`] - Focused zone and environment, re-derived after mutations

pub mod selection;
pub mod zone;

pub use selection::Selection;
pub use zone::{Environment, Server, ServerStatus, Zone, ZONE_TYPE};
