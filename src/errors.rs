// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for inventory operations

use std::fmt;

use thiserror::Error;

/// Level of the inventory tree an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Zone,
    Environment,
    Server,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Zone => write!(f, "zone"),
            ResourceKind::Environment => write!(f, "environment"),
            ResourceKind::Server => write!(f, "server"),
        }
    }
}

/// Errors that can occur in inventory operations
///
/// Cloneable so the synchronizer can keep the last failure in its published
/// state while also returning it to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Requested zone, environment or server key is absent
    #[error("{kind} not found: {key}")]
    NotFound { kind: ResourceKind, key: String },

    /// Command issued in a state that violates its precondition
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Write rejected because the revision token is stale
    #[error("Revision conflict on zone {zone}: {message}")]
    Conflict { zone: String, message: String },

    /// Sibling key already present
    #[error("{kind} already exists: {key}")]
    Duplicate { kind: ResourceKind, key: String },

    /// Network or store failure unrelated to the above
    #[error("Transport error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Wire body could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Local file I/O error (snapshot import/export)
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

impl InventoryError {
    pub fn zone_not_found(name: impl Into<String>) -> Self {
        InventoryError::NotFound {
            kind: ResourceKind::Zone,
            key: name.into(),
        }
    }

    pub fn environment_not_found(zone: &str, env: &str) -> Self {
        InventoryError::NotFound {
            kind: ResourceKind::Environment,
            key: format!("{}/{}", zone, env),
        }
    }

    pub fn server_not_found(zone: &str, env: &str, fqdn: &str) -> Self {
        InventoryError::NotFound {
            kind: ResourceKind::Server,
            key: format!("{}/{}/{}", zone, env, fqdn),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InventoryError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, InventoryError::Conflict { .. })
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return InventoryError::Serialization(err.to_string());
        }
        InventoryError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
