//! Resource request builder.
//!
//! Turns an accepted configuration and its resolved naming into the requests
//! sent to the provider. Pure data transformation, no I/O.

use super::tags::merge_tags;
use crate::config;
use crate::models::{
    BgpConnectionRequest, DiagnosticsRequest, PublicIpRequest, ResolvedNaming,
    ResourceRequestSet, RouteServerRequest,
};
use crate::validation::Accepted;

/// Metric categories exported by the diagnostics binding.
const DIAGNOSTIC_METRICS: &[&str] = &["AllMetrics"];
/// Log category groups exported by the diagnostics binding.
const DIAGNOSTIC_LOG_GROUPS: &[&str] = &["allLogs"];

/// Build the full request set.
///
/// # Arguments
/// * `accepted` - Configuration that passed validation
/// * `naming` - Suffix and base tags from the naming resolver
pub fn build_requests(accepted: Accepted<'_>, naming: &ResolvedNaming) -> ResourceRequestSet {
    let config = accepted.config();
    let suffix = &naming.resource_suffix;
    let tags = merge_tags(&naming.tags, &config.optional_tags);
    let binding = &config.location_binding;

    let public_ip = PublicIpRequest {
        name: format!("{}{suffix}", config::PUBLIC_IP_PREFIX),
        location: binding.location.clone(),
        resource_group_name: binding.resource_group_name.clone(),
        allocation_method: config.public_ip_allocation_method.clone(),
        sku: config.public_ip_sku.clone(),
        tags: tags.clone(),
    };

    let route_server = RouteServerRequest {
        name: format!("{}{suffix}", config::ROUTE_SERVER_PREFIX),
        location: binding.location.clone(),
        resource_group_name: binding.resource_group_name.clone(),
        sku: config.service_sku.clone(),
        branch_to_branch_enabled: config.branch_to_branch_enabled,
        subnet_id: config.subnet_reference.id.clone(),
        public_ip_name: public_ip.name.clone(),
        tags,
    };

    let bgp_connections = config
        .peer_connections
        .iter()
        .map(|(key, peer)| {
            let request = BgpConnectionRequest {
                name: format!("{}{key}", config::BGP_CONNECTION_PREFIX),
                resource_group_name: binding.resource_group_name.clone(),
                route_server_name: route_server.name.clone(),
                // Range checked by validation.
                peer_asn: u32::try_from(peer.peer_asn).unwrap_or(u32::MAX),
                peer_ip: peer.peer_ip.clone(),
            };
            (key.clone(), request)
        })
        .collect();

    let diagnostics = config
        .diagnostics
        .workspace()
        .map(|workspace_id| DiagnosticsRequest {
            name: format!("{}{suffix}", config::DIAGNOSTICS_PREFIX),
            route_server_name: route_server.name.clone(),
            log_analytics_workspace_id: workspace_id.to_string(),
            metric_categories: DIAGNOSTIC_METRICS.iter().map(|s| s.to_string()).collect(),
            log_category_groups: DIAGNOSTIC_LOG_GROUPS.iter().map(|s| s.to_string()).collect(),
        });

    let requests = ResourceRequestSet {
        public_ip,
        route_server,
        bgp_connections,
        diagnostics,
    };
    log::debug!(
        "built {} request(s) for suffix '{suffix}'",
        requests.request_count()
    );
    requests
}
