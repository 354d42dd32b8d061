//! Provider creation requests.
//!
//! Requests only carry the *names* of the resources they depend on. The ids are
//! known once the provider has created the dependency, so gateway calls take
//! them as separate arguments.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Public IP address for the Route Server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicIpRequest {
    pub name: String,
    pub location: String,
    pub resource_group_name: String,
    pub allocation_method: String,
    pub sku: String,
    pub tags: BTreeMap<String, String>,
}

/// The Route Server itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RouteServerRequest {
    pub name: String,
    pub location: String,
    pub resource_group_name: String,
    pub sku: String,
    pub branch_to_branch_enabled: bool,
    pub subnet_id: String,
    /// Name of the public IP this server attaches to.
    pub public_ip_name: String,
    pub tags: BTreeMap<String, String>,
}

/// One BGP peering on the Route Server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BgpConnectionRequest {
    pub name: String,
    pub resource_group_name: String,
    /// Name of the owning Route Server.
    pub route_server_name: String,
    pub peer_asn: u32,
    pub peer_ip: String,
}

/// Diagnostic settings sending Route Server telemetry to Log Analytics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsRequest {
    pub name: String,
    /// Name of the monitored Route Server.
    pub route_server_name: String,
    pub log_analytics_workspace_id: String,
    pub metric_categories: Vec<String>,
    pub log_category_groups: Vec<String>,
}

/// Everything one configuration compiles to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequestSet {
    pub public_ip: PublicIpRequest,
    pub route_server: RouteServerRequest,
    /// Keyed by the connection key from the configuration.
    pub bgp_connections: BTreeMap<String, BgpConnectionRequest>,
    pub diagnostics: Option<DiagnosticsRequest>,
}

impl ResourceRequestSet {
    /// Number of requests submitted to the provider.
    pub fn request_count(&self) -> usize {
        2 + self.bgp_connections.len() + usize::from(self.diagnostics.is_some())
    }
}
