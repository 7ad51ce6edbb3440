// Copyright (c) 2025 - Cowboy AI, Inc.
//! Zone, Environment and Server documents
//!
//! A [`Zone`] is the unit of storage. Environments and servers only exist as
//! part of their owning zone document and are never stored on their own.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "_id": "zone:core",
//!   "_rev": "3-0193f0c2a1b87d0e9f1a2b3c4d5e6f70",
//!   "name": "core",
//!   "type": "zone",
//!   "environments": [
//!     {
//!       "name": "prod",
//!       "servers": [
//!         { "fqdn": "web01.core.example.com", "ip": "10.0.0.1",
//!           "status": "available", "server_type": "web" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default document type tag for zones
pub const ZONE_TYPE: &str = "zone";

fn default_zone_type() -> String {
    ZONE_TYPE.to_string()
}

/// Operational status of a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Available,
    Unavailable,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStatus::Available => write!(f, "available"),
            ServerStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Leaf record, keyed by `fqdn` within its environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub fqdn: String,
    pub ip: String,
    pub status: ServerStatus,
    pub server_type: String,
}

impl Server {
    pub fn new(
        fqdn: impl Into<String>,
        ip: impl Into<String>,
        status: ServerStatus,
        server_type: impl Into<String>,
    ) -> Self {
        Self {
            fqdn: fqdn.into(),
            ip: ip.into(),
            status,
            server_type: server_type.into(),
        }
    }
}

/// Named, ordered collection of servers within a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub servers: Vec<Server>,
}

impl Environment {
    /// Create an environment with no servers
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            servers: Vec::new(),
        }
    }

    pub fn with_servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }

    /// Look up a server by fqdn
    pub fn server(&self, fqdn: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.fqdn == fqdn)
    }

    pub fn server_position(&self, fqdn: &str) -> Option<usize> {
        self.servers.iter().position(|s| s.fqdn == fqdn)
    }
}

/// Root aggregate document
///
/// `id` and `revision` are assigned by the store. A zone built locally has
/// neither; a zone read back from the store carries both, and the revision
/// must be sent back unchanged on the next write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    pub name: String,

    #[serde(rename = "type", default = "default_zone_type")]
    pub zone_type: String,

    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl Zone {
    /// Create an empty zone that has not been stored yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            revision: None,
            name: name.into(),
            zone_type: default_zone_type(),
            environments: Vec::new(),
        }
    }

    pub fn with_environments(mut self, environments: Vec<Environment>) -> Self {
        self.environments = environments;
        self
    }

    /// Look up an environment by name
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    pub fn environment_position(&self, name: &str) -> Option<usize> {
        self.environments.iter().position(|e| e.name == name)
    }

    /// Copy of this zone without store-assigned identity
    pub fn detached(&self) -> Self {
        Self {
            id: None,
            revision: None,
            ..self.clone()
        }
    }

    /// Total number of servers across all environments
    pub fn server_count(&self) -> usize {
        self.environments.iter().map(|e| e.servers.len()).sum()
    }
}
