//! [`ProviderGateway`] backed by the Azure CLI.

use super::cli::{AzCommand, CODE_INVALID_RESPONSE};
use super::gateway::{BgpConnectionCreated, ProviderGateway, PublicIpCreated, RouteServerCreated};
use crate::config;
use crate::error::ProviderError;
use crate::models::{BgpConnectionRequest, DiagnosticsRequest, PublicIpRequest, RouteServerRequest};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

/// `az network public-ip create` output.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PublicIpEnvelope {
    public_ip: PublicIpBody,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PublicIpBody {
    id: String,
    ip_address: String,
}

/// `az network routeserver create|update` output.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RouteServerBody {
    id: String,
    name: String,
    virtual_router_asn: u32,
    #[serde(default)]
    virtual_router_ips: Vec<String>,
}

/// `az network routeserver peering create` output.
#[derive(Deserialize, Debug)]
struct PeeringBody {
    id: String,
    name: String,
}

/// Runs `az` commands on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct AzCliGateway {
    program: String,
}

impl Default for AzCliGateway {
    fn default() -> Self {
        AzCliGateway::new(config::DEFAULT_AZ_CLI)
    }
}

impl AzCliGateway {
    pub fn new(program: impl Into<String>) -> Self {
        AzCliGateway {
            program: program.into(),
        }
    }

    fn command(&self, subcommand: &[&str]) -> AzCommand {
        AzCommand::new(&self.program, subcommand)
    }

    pub fn public_ip_command(&self, request: &PublicIpRequest) -> AzCommand {
        self.command(&["network", "public-ip", "create"])
            .arg("--name", &request.name)
            .arg("--resource-group", &request.resource_group_name)
            .arg("--location", &request.location)
            .arg("--allocation-method", &request.allocation_method)
            .arg("--sku", &request.sku)
            .args("--tags", tag_args(&request.tags))
    }

    pub fn route_server_command(&self, request: &RouteServerRequest, public_ip_id: &str) -> AzCommand {
        self.command(&["network", "routeserver", "create"])
            .arg("--name", &request.name)
            .arg("--resource-group", &request.resource_group_name)
            .arg("--location", &request.location)
            .arg("--hosted-subnet", &request.subnet_id)
            .arg("--public-ip-address", public_ip_id)
            .args("--tags", tag_args(&request.tags))
    }

    pub fn branch_to_branch_command(&self, request: &RouteServerRequest) -> AzCommand {
        self.command(&["network", "routeserver", "update"])
            .arg("--name", &request.name)
            .arg("--resource-group", &request.resource_group_name)
            .arg("--allow-b2b-traffic", request.branch_to_branch_enabled.to_string())
    }

    pub fn bgp_connection_command(&self, request: &BgpConnectionRequest) -> AzCommand {
        self.command(&["network", "routeserver", "peering", "create"])
            .arg("--name", &request.name)
            .arg("--resource-group", &request.resource_group_name)
            .arg("--routeserver", &request.route_server_name)
            .arg("--peer-asn", request.peer_asn.to_string())
            .arg("--peer-ip", &request.peer_ip)
    }

    pub fn diagnostics_command(&self, request: &DiagnosticsRequest, route_server_id: &str) -> AzCommand {
        let metrics = request
            .metric_categories
            .iter()
            .map(|c| serde_json::json!({ "category": c, "enabled": true }))
            .collect::<Vec<_>>();
        let logs = request
            .log_category_groups
            .iter()
            .map(|g| serde_json::json!({ "categoryGroup": g, "enabled": true }))
            .collect::<Vec<_>>();
        self.command(&["monitor", "diagnostic-settings", "create"])
            .arg("--name", &request.name)
            .arg("--resource", route_server_id)
            .arg("--workspace", &request.log_analytics_workspace_id)
            .arg("--metrics", serde_json::Value::from(metrics).to_string())
            .arg("--logs", serde_json::Value::from(logs).to_string())
    }
}

fn tag_args(tags: &BTreeMap<String, String>) -> Vec<String> {
    tags.iter().map(|(k, v)| format!("{k}={v}")).collect()
}

/// Run on the blocking pool, `az` can take minutes for a Route Server.
async fn run_blocking<T>(command: AzCommand) -> Result<T, ProviderError>
where
    T: DeserializeOwned + Send + 'static,
{
    tokio::task::spawn_blocking(move || command.run_json::<T>())
        .await
        .map_err(|e| ProviderError::new("TaskFailed", e.to_string()))?
}

fn into_created(body: RouteServerBody) -> Result<RouteServerCreated, ProviderError> {
    let router_ips: [String; 2] = body.virtual_router_ips.try_into().map_err(|ips: Vec<String>| {
        ProviderError::new(
            CODE_INVALID_RESPONSE,
            format!("expected 2 virtual router IPs, got {}", ips.len()),
        )
    })?;
    Ok(RouteServerCreated {
        id: body.id,
        name: body.name,
        asn: body.virtual_router_asn,
        router_ips,
    })
}

#[async_trait]
impl ProviderGateway for AzCliGateway {
    async fn create_public_ip(
        &self,
        request: &PublicIpRequest,
    ) -> Result<PublicIpCreated, ProviderError> {
        let body: PublicIpEnvelope = run_blocking(self.public_ip_command(request)).await?;
        Ok(PublicIpCreated {
            id: body.public_ip.id,
            ip_address: body.public_ip.ip_address,
        })
    }

    async fn create_route_server(
        &self,
        request: &RouteServerRequest,
        public_ip_id: &str,
    ) -> Result<RouteServerCreated, ProviderError> {
        let mut body: RouteServerBody =
            run_blocking(self.route_server_command(request, public_ip_id)).await?;
        if request.branch_to_branch_enabled {
            body = run_blocking(self.branch_to_branch_command(request)).await?;
        }
        into_created(body)
    }

    async fn create_bgp_connection(
        &self,
        request: &BgpConnectionRequest,
        _route_server_id: &str,
    ) -> Result<BgpConnectionCreated, ProviderError> {
        let body: PeeringBody = run_blocking(self.bgp_connection_command(request)).await?;
        Ok(BgpConnectionCreated {
            id: body.id,
            name: body.name,
        })
    }

    async fn bind_diagnostics(
        &self,
        request: &DiagnosticsRequest,
        route_server_id: &str,
    ) -> Result<(), ProviderError> {
        let _: serde_json::Value =
            run_blocking(self.diagnostics_command(request, route_server_id)).await?;
        Ok(())
    }
}
