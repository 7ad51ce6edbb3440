// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Client - typed operations over the zone document API
//!
//! One operation per (tree level × verb). Every operation is a single round
//! trip with no retries and no caching; failures propagate unchanged.
//!
//! # Resource Hierarchy
//!
//! ```text
//! zones
//! zones/{zone}
//! zones/{zone}/environments
//! zones/{zone}/environments/{env}
//! zones/{zone}/environments/{env}/servers
//! zones/{zone}/environments/{env}/servers/{fqdn}
//! ```
//!
//! Every environment or server mutation ends up as one full-document write
//! of the owning zone on the store side. Mutations return the authoritative
//! post-write zone, carrying its new revision.
//!
//! # Implementations
//!
//! - [`HttpResourceClient`] - reqwest client for the HTTP API
//! - [`crate::store::InMemoryZoneStore`] - in-process revisioned store

use async_trait::async_trait;

use crate::domain::{Environment, Server, Zone};
use crate::errors::InventoryResult;

pub mod http;

pub use http::HttpResourceClient;

/// Typed request/response mapping onto the zone document store
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// List every zone in the store
    async fn list_zones(&self) -> InventoryResult<Vec<Zone>>;

    /// Fetch one zone
    ///
    /// # Errors
    ///
    /// - `NotFound` if no zone has this name (never reported as `Transport`)
    async fn get_zone(&self, name: &str) -> InventoryResult<Zone>;

    /// Create a zone document
    async fn create_zone(&self, zone: &Zone) -> InventoryResult<Zone>;

    /// Replace a zone document
    ///
    /// The zone's `revision` is validated by the store; a stale token fails
    /// with `Conflict` and the stored document is left unchanged.
    async fn update_zone(&self, zone: &Zone) -> InventoryResult<Zone>;

    /// Delete a zone and everything nested in it
    async fn delete_zone(&self, name: &str) -> InventoryResult<()>;

    async fn add_environment(&self, zone: &str, environment: &Environment) -> InventoryResult<Zone>;

    async fn update_environment(
        &self,
        zone: &str,
        env: &str,
        environment: &Environment,
    ) -> InventoryResult<Zone>;

    async fn delete_environment(&self, zone: &str, env: &str) -> InventoryResult<Zone>;

    async fn add_server(&self, zone: &str, env: &str, server: &Server) -> InventoryResult<Zone>;

    async fn update_server(
        &self,
        zone: &str,
        env: &str,
        fqdn: &str,
        server: &Server,
    ) -> InventoryResult<Zone>;

    async fn delete_server(&self, zone: &str, env: &str, fqdn: &str) -> InventoryResult<Zone>;
}

/// Supplies the bearer credential attached to outbound calls
///
/// Token acquisition and refresh live outside this crate; the client only
/// asks for the current token on each request.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token (or none)
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
