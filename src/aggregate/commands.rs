// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tree Edit Commands
//!
//! Each command describes one change to the nested collections of a zone.
//! Commands address their targets by unique key (environment name, server
//! fqdn) and never by position, because the authoritative copy may have been
//! reordered between the read and the write.
//!
//! # Command Pattern
//!
//! ```text
//! TreeEdit → apply_edit(Zone, TreeEdit) → Result<Zone, InventoryError>
//! ```

use crate::domain::{Environment, Server};

/// A single change to a zone's environments or servers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEdit {
    /// Append an environment to the end of the zone
    AddEnvironment(Environment),

    /// Replace the environment named `name` in place
    ReplaceEnvironment {
        name: String,
        environment: Environment,
    },

    /// Remove the environment named `name`
    RemoveEnvironment { name: String },

    /// Append a server to the end of an environment
    AddServer { environment: String, server: Server },

    /// Replace the server with `fqdn` in place
    ReplaceServer {
        environment: String,
        fqdn: String,
        server: Server,
    },

    /// Remove the server with `fqdn`
    RemoveServer { environment: String, fqdn: String },
}

impl TreeEdit {
    /// Environment this edit targets (by its current name)
    pub fn environment_name(&self) -> &str {
        match self {
            TreeEdit::AddEnvironment(env) => &env.name,
            TreeEdit::ReplaceEnvironment { name, .. } | TreeEdit::RemoveEnvironment { name } => {
                name
            }
            TreeEdit::AddServer { environment, .. }
            | TreeEdit::ReplaceServer { environment, .. }
            | TreeEdit::RemoveServer { environment, .. } => environment,
        }
    }

    /// Short verb for log lines
    pub fn label(&self) -> &'static str {
        match self {
            TreeEdit::AddEnvironment(_) => "add_environment",
            TreeEdit::ReplaceEnvironment { .. } => "update_environment",
            TreeEdit::RemoveEnvironment { .. } => "delete_environment",
            TreeEdit::AddServer { .. } => "add_server",
            TreeEdit::ReplaceServer { .. } => "update_server",
            TreeEdit::RemoveServer { .. } => "delete_server",
        }
    }
}
