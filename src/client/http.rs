// Copyright (c) 2025 - Cowboy AI, Inc.
//! HTTP Resource Client
//!
//! Maps [`ResourceClient`] operations onto the inventory REST API:
//!
//! ```text
//! list_zones         = GET    /zones/
//! get_zone           = GET    /zones/{zone}
//! create_zone        = POST   /zones/
//! update_zone        = PUT    /zones/{zone}
//! delete_zone        = DELETE /zones/{zone}
//! add_environment    = POST   /zones/{zone}/environments/
//! update_environment = PUT    /zones/{zone}/environments/{env}
//! delete_environment = DELETE /zones/{zone}/environments/{env}
//! add_server         = POST   /zones/{zone}/environments/{env}/servers/
//! update_server      = PUT    /zones/{zone}/environments/{env}/servers/{fqdn}
//! delete_server      = DELETE /zones/{zone}/environments/{env}/servers/{fqdn}
//! ```
//!
//! # Status Mapping
//!
//! - 2xx → success
//! - 404 → `NotFound`
//! - 409 → `Conflict` (stale `_rev`)
//! - anything else, including 401/403 → `Transport` with the status
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zone_inventory::client::{HttpResourceClient, ResourceClient, StaticToken};
//! use zone_inventory::config::ClientConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:8000");
//!     let client = HttpResourceClient::new(config, Arc::new(StaticToken::new("token")))?;
//!
//!     for zone in client.list_zones().await? {
//!         println!("{} ({} environments)", zone.name, zone.environments.len());
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use urlencoding::encode;

use super::{CredentialProvider, ResourceClient};
use crate::config::ClientConfig;
use crate::domain::{Environment, Server, Zone};
use crate::errors::{InventoryError, InventoryResult, ResourceKind};

/// What a request addresses, used to build precise errors
#[derive(Debug, Clone)]
struct Target {
    kind: ResourceKind,
    zone: String,
    key: String,
}

impl Target {
    fn zone(zone: &str) -> Self {
        Self {
            kind: ResourceKind::Zone,
            zone: zone.to_string(),
            key: zone.to_string(),
        }
    }

    fn environment(zone: &str, env: &str) -> Self {
        Self {
            kind: ResourceKind::Environment,
            zone: zone.to_string(),
            key: format!("{}/{}", zone, env),
        }
    }

    fn server(zone: &str, env: &str, fqdn: &str) -> Self {
        Self {
            kind: ResourceKind::Server,
            zone: zone.to_string(),
            key: format!("{}/{}/{}", zone, env, fqdn),
        }
    }
}

/// Translate a non-success status into the error taxonomy
fn error_for_status(status: StatusCode, body: String, target: &Target) -> InventoryError {
    match status {
        StatusCode::NOT_FOUND => InventoryError::NotFound {
            kind: target.kind,
            key: target.key.clone(),
        },
        StatusCode::CONFLICT => InventoryError::Conflict {
            zone: target.zone.clone(),
            message: if body.is_empty() {
                "document update conflict".to_string()
            } else {
                body
            },
        },
        other => InventoryError::Transport {
            status: Some(other.as_u16()),
            message: format!("Inventory API returned {}: {}", other, body),
        },
    }
}

/// reqwest-backed [`ResourceClient`]
pub struct HttpResourceClient {
    config: ClientConfig,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpResourceClient {
    /// Create a new HTTP resource client
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> InventoryResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    "application/json".parse().map_err(|e| {
                        InventoryError::Configuration(format!("Invalid header: {}", e))
                    })?,
                );
                headers
            })
            .build()
            .map_err(|e| {
                InventoryError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            client,
            credentials,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn zones_url(&self) -> String {
        format!("{}/zones/", self.config.api_root())
    }

    fn zone_url(&self, zone: &str) -> String {
        format!("{}/zones/{}", self.config.api_root(), encode(zone))
    }

    fn environments_url(&self, zone: &str) -> String {
        format!("{}/environments/", self.zone_url(zone))
    }

    fn environment_url(&self, zone: &str, env: &str) -> String {
        format!("{}/environments/{}", self.zone_url(zone), encode(env))
    }

    fn servers_url(&self, zone: &str, env: &str) -> String {
        format!("{}/servers/", self.environment_url(zone, env))
    }

    fn server_url(&self, zone: &str, env: &str, fqdn: &str) -> String {
        format!("{}/servers/{}", self.environment_url(zone, env), encode(fqdn))
    }

    /// Attach credentials, send, and turn error statuses into errors
    async fn execute(&self, request: RequestBuilder, target: &Target) -> InventoryResult<Response> {
        let request = match self.credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| InventoryError::Transport {
            status: None,
            message: format!("Inventory API error: {}", e),
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("Inventory API {} for {} {}", status, target.kind, target.key);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, body, target))
    }

    /// Send a write and decode whatever acknowledgement the API returns
    async fn write(&self, request: RequestBuilder, target: &Target) -> InventoryResult<WriteResponse> {
        let response = self.execute(request, target).await?;
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(WriteResponse::Ack(WriteAck::default()));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Zone after a nested write; fetched again if the API only acknowledged
    async fn nested_result(&self, zone: &str, response: WriteResponse) -> InventoryResult<Zone> {
        match response {
            WriteResponse::Document(written) => Ok(written),
            WriteResponse::Ack(ack) => {
                debug!("Inventory API acknowledged write on {}: {:?}", zone, ack.message);
                self.get_zone(zone).await
            }
        }
    }
}

/// Body of a successful write
///
/// Some deployments echo the stored zone, others answer with a message
/// object such as `{"message": "...", "id": "zone:core"}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WriteResponse {
    Document(Zone),
    Ack(WriteAck),
}

#[derive(Debug, Default, Deserialize)]
struct WriteAck {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn list_zones(&self) -> InventoryResult<Vec<Zone>> {
        let target = Target::zone("*");
        let response = self.execute(self.client.get(self.zones_url()), &target).await?;
        Ok(response.json::<Vec<Zone>>().await?)
    }

    async fn get_zone(&self, name: &str) -> InventoryResult<Zone> {
        let request = self.client.get(self.zone_url(name));
        let response = self.execute(request, &Target::zone(name)).await?;
        Ok(response.json::<Zone>().await?)
    }

    /// Acknowledgement-only responses yield the submitted zone with the
    /// store id, if one was returned
    async fn create_zone(&self, zone: &Zone) -> InventoryResult<Zone> {
        let request = self.client.post(self.zones_url()).json(zone);
        match self.write(request, &Target::zone(&zone.name)).await? {
            WriteResponse::Document(created) => Ok(created),
            WriteResponse::Ack(ack) => Ok(Zone {
                id: ack.id.or_else(|| zone.id.clone()),
                ..zone.clone()
            }),
        }
    }

    /// Acknowledgement-only responses yield the submitted zone
    async fn update_zone(&self, zone: &Zone) -> InventoryResult<Zone> {
        let request = self.client.put(self.zone_url(&zone.name)).json(zone);
        match self.write(request, &Target::zone(&zone.name)).await? {
            WriteResponse::Document(updated) => Ok(updated),
            WriteResponse::Ack(_) => Ok(zone.clone()),
        }
    }

    async fn delete_zone(&self, name: &str) -> InventoryResult<()> {
        let request = self.client.delete(self.zone_url(name));
        self.execute(request, &Target::zone(name)).await?;
        Ok(())
    }

    async fn add_environment(&self, zone: &str, environment: &Environment) -> InventoryResult<Zone> {
        let request = self.client.post(self.environments_url(zone)).json(environment);
        let response = self.write(request, &Target::zone(zone)).await?;
        self.nested_result(zone, response).await
    }

    async fn update_environment(
        &self,
        zone: &str,
        env: &str,
        environment: &Environment,
    ) -> InventoryResult<Zone> {
        let request = self.client.put(self.environment_url(zone, env)).json(environment);
        let response = self.write(request, &Target::environment(zone, env)).await?;
        self.nested_result(zone, response).await
    }

    async fn delete_environment(&self, zone: &str, env: &str) -> InventoryResult<Zone> {
        let request = self.client.delete(self.environment_url(zone, env));
        let response = self.write(request, &Target::environment(zone, env)).await?;
        self.nested_result(zone, response).await
    }

    async fn add_server(&self, zone: &str, env: &str, server: &Server) -> InventoryResult<Zone> {
        let request = self.client.post(self.servers_url(zone, env)).json(server);
        let response = self.write(request, &Target::environment(zone, env)).await?;
        self.nested_result(zone, response).await
    }

    async fn update_server(
        &self,
        zone: &str,
        env: &str,
        fqdn: &str,
        server: &Server,
    ) -> InventoryResult<Zone> {
        let request = self.client.put(self.server_url(zone, env, fqdn)).json(server);
        let response = self.write(request, &Target::server(zone, env, fqdn)).await?;
        self.nested_result(zone, response).await
    }

    async fn delete_server(&self, zone: &str, env: &str, fqdn: &str) -> InventoryResult<Zone> {
        let request = self.client.delete(self.server_url(zone, env, fqdn));
        let response = self.write(request, &Target::server(zone, env, fqdn)).await?;
        self.nested_result(zone, response).await
    }
}
