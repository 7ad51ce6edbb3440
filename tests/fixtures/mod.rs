// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for zone-inventory
//!
//! Provides deterministic inventory trees for the integration suites.
//! Names, addresses and timestamps are fixed constants so tests are
//! reproducible.
//!
//! # Design Principles
//! - All test data is deterministic (no `Utc::now()`)
//! - Stores are seeded through the public client API, never by hand
//! - Each test builds its own store and synchronizer

#![allow(dead_code)]

use chrono::{DateTime, Utc};

use zone_inventory::domain::{Environment, Server, ServerStatus, Zone};
use zone_inventory::store::InMemoryZoneStore;
use zone_inventory::{ResourceClient, TreeSynchronizer};

pub const ZONE_CORE: &str = "core";
pub const ZONE_EDGE: &str = "edge";

pub const ENV_DEV: &str = "dev";
pub const ENV_PROD: &str = "prod";

pub const WEB_01: &str = "web01.core.example.com";
pub const WEB_02: &str = "web02.core.example.com";
pub const DB_01: &str = "db01.core.example.com";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

pub fn web_server(fqdn: &str) -> Server {
    Server::new(fqdn, "10.0.1.10", ServerStatus::Available, "web")
}

pub fn db_server(fqdn: &str) -> Server {
    Server::new(fqdn, "10.0.2.10", ServerStatus::Unavailable, "db")
}

/// `core` zone: `dev` (empty) and `prod` with web01, web02, db01 in order
pub fn core_zone() -> Zone {
    Zone::new(ZONE_CORE).with_environments(vec![
        Environment::new(ENV_DEV),
        Environment::new(ENV_PROD).with_servers(vec![
            web_server(WEB_01),
            web_server(WEB_02),
            db_server(DB_01),
        ]),
    ])
}

/// `edge` zone with no environments
pub fn edge_zone() -> Zone {
    Zone::new(ZONE_EDGE)
}

/// Store holding `core` and `edge`
pub async fn seeded_store() -> InMemoryZoneStore {
    let store = InMemoryZoneStore::new();
    store
        .create_zone(&core_zone())
        .await
        .expect("Failed to seed core zone");
    store
        .create_zone(&edge_zone())
        .await
        .expect("Failed to seed edge zone");
    store
}

/// Synchronizer over [`seeded_store`], already refreshed
pub async fn seeded_synchronizer() -> TreeSynchronizer<InMemoryZoneStore> {
    let mut sync = TreeSynchronizer::from_client(seeded_store().await);
    sync.refresh().await.expect("Failed to load seeded tree");
    sync
}

/// Server fqdns of one environment, in stored order
pub fn fqdns(zone: &Zone, env: &str) -> Vec<String> {
    zone.environment(env)
        .map(|e| e.servers.iter().map(|s| s.fqdn.clone()).collect())
        .unwrap_or_default()
}
