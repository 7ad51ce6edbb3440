// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory API connection configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{InventoryError, InventoryResult};

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "INVENTORY_API_URL";
/// Environment variable holding the bearer token
pub const ENV_API_TOKEN: &str = "INVENTORY_API_TOKEN";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "INVENTORY_TIMEOUT_SECS";

/// Configuration for the inventory HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Bearer token attached to every request, if any
    #[serde(default)]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> InventoryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> InventoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                InventoryError::Configuration(format!("{} is not a number: {}", ENV_TIMEOUT_SECS, raw))
            })?,
            None => defaults.timeout_secs,
        };

        let config = Self {
            base_url: lookup(ENV_API_URL).unwrap_or(defaults.base_url),
            api_token: lookup(ENV_API_TOKEN).filter(|t| !t.is_empty()),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be used to build a client
    pub fn validate(&self) -> InventoryResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(InventoryError::Configuration(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(InventoryError::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
