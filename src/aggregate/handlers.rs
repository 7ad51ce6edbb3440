// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Edit Handlers for the Zone Aggregate
//!
//! Handlers take the current zone document and an edit, enforce sibling-key
//! invariants, and return the rewritten document. They perform no I/O and
//! keep `id`/`revision` untouched so the result can be written back under
//! optimistic concurrency.
//!
//! # Ordering Rules
//!
//! - Add appends to the end
//! - Replace keeps the element's position
//! - Remove shifts the following elements left

use crate::aggregate::commands::TreeEdit;
use crate::domain::{Environment, Server, Zone};
use crate::errors::{InventoryError, InventoryResult, ResourceKind};

/// Apply an edit to a zone, producing the rewritten zone
pub fn apply_edit(zone: &Zone, edit: &TreeEdit) -> InventoryResult<Zone> {
    let mut next = zone.clone();
    match edit {
        TreeEdit::AddEnvironment(environment) => {
            next.environments = add_environment(zone, environment)?;
        }
        TreeEdit::ReplaceEnvironment { name, environment } => {
            next.environments = replace_environment(zone, name, environment)?;
        }
        TreeEdit::RemoveEnvironment { name } => {
            next.environments = remove_environment(zone, name)?;
        }
        TreeEdit::AddServer {
            environment,
            server,
        } => {
            let idx = environment_index(zone, environment)?;
            next.environments[idx].servers = add_server(zone, &zone.environments[idx], server)?;
        }
        TreeEdit::ReplaceServer {
            environment,
            fqdn,
            server,
        } => {
            let idx = environment_index(zone, environment)?;
            next.environments[idx].servers =
                replace_server(zone, &zone.environments[idx], fqdn, server)?;
        }
        TreeEdit::RemoveServer { environment, fqdn } => {
            let idx = environment_index(zone, environment)?;
            next.environments[idx].servers = remove_server(zone, &zone.environments[idx], fqdn)?;
        }
    }
    Ok(next)
}

fn environment_index(zone: &Zone, name: &str) -> InventoryResult<usize> {
    zone.environment_position(name)
        .ok_or_else(|| InventoryError::environment_not_found(&zone.name, name))
}

/// Append an environment; its name must not already exist in the zone
pub fn add_environment(zone: &Zone, environment: &Environment) -> InventoryResult<Vec<Environment>> {
    if zone.environment(&environment.name).is_some() {
        return Err(InventoryError::Duplicate {
            kind: ResourceKind::Environment,
            key: format!("{}/{}", zone.name, environment.name),
        });
    }
    let mut environments = zone.environments.clone();
    environments.push(environment.clone());
    Ok(environments)
}

/// Replace the environment named `name` in place
///
/// A rename is allowed as long as the new name does not collide with another
/// sibling.
pub fn replace_environment(
    zone: &Zone,
    name: &str,
    environment: &Environment,
) -> InventoryResult<Vec<Environment>> {
    let idx = environment_index(zone, name)?;
    if environment.name != name && zone.environment(&environment.name).is_some() {
        return Err(InventoryError::Duplicate {
            kind: ResourceKind::Environment,
            key: format!("{}/{}", zone.name, environment.name),
        });
    }
    let mut environments = zone.environments.clone();
    environments[idx] = environment.clone();
    Ok(environments)
}

/// Remove the environment named `name` and everything it contains
pub fn remove_environment(zone: &Zone, name: &str) -> InventoryResult<Vec<Environment>> {
    let idx = environment_index(zone, name)?;
    let mut environments = zone.environments.clone();
    environments.remove(idx);
    Ok(environments)
}

/// Append a server; its fqdn must not already exist in the environment
pub fn add_server(zone: &Zone, environment: &Environment, server: &Server) -> InventoryResult<Vec<Server>> {
    if environment.server(&server.fqdn).is_some() {
        return Err(InventoryError::Duplicate {
            kind: ResourceKind::Server,
            key: format!("{}/{}/{}", zone.name, environment.name, server.fqdn),
        });
    }
    let mut servers = environment.servers.clone();
    servers.push(server.clone());
    Ok(servers)
}

/// Replace the server with `fqdn` in place
pub fn replace_server(
    zone: &Zone,
    environment: &Environment,
    fqdn: &str,
    server: &Server,
) -> InventoryResult<Vec<Server>> {
    let idx = environment
        .server_position(fqdn)
        .ok_or_else(|| InventoryError::server_not_found(&zone.name, &environment.name, fqdn))?;
    if server.fqdn != fqdn && environment.server(&server.fqdn).is_some() {
        return Err(InventoryError::Duplicate {
            kind: ResourceKind::Server,
            key: format!("{}/{}/{}", zone.name, environment.name, server.fqdn),
        });
    }
    let mut servers = environment.servers.clone();
    servers[idx] = server.clone();
    Ok(servers)
}

/// Remove the server with `fqdn`
pub fn remove_server(zone: &Zone, environment: &Environment, fqdn: &str) -> InventoryResult<Vec<Server>> {
    let idx = environment
        .server_position(fqdn)
        .ok_or_else(|| InventoryError::server_not_found(&zone.name, &environment.name, fqdn))?;
    let mut servers = environment.servers.clone();
    servers.remove(idx);
    Ok(servers)
}
