//! Output projection.
//!
//! Maps provider results and the submitted requests into a [`ResultDocument`].

use crate::azure::{BgpConnectionCreated, PublicIpCreated, RouteServerCreated};
use crate::models::{BgpConnectionOutput, ResourceRequestSet, ResultDocument};
use std::collections::BTreeMap;

/// Build the result document.
///
/// `connections` must hold one entry per key of `requests.bgp_connections`.
/// The ASN is taken from the provider, never computed here.
pub fn project(
    requests: &ResourceRequestSet,
    public_ip: &PublicIpCreated,
    route_server: &RouteServerCreated,
    connections: &BTreeMap<String, BgpConnectionCreated>,
) -> ResultDocument {
    let bgp_connections: BTreeMap<String, BgpConnectionOutput> = requests
        .bgp_connections
        .iter()
        .filter_map(|(key, request)| {
            connections.get(key).map(|created| {
                let output = BgpConnectionOutput {
                    id: created.id.clone(),
                    name: created.name.clone(),
                    peer_asn: request.peer_asn,
                    peer_ip: request.peer_ip.clone(),
                };
                (key.clone(), output)
            })
        })
        .collect();

    let bgp_connection_ids = bgp_connections
        .iter()
        .map(|(key, c)| (key.clone(), c.id.clone()))
        .collect();

    ResultDocument {
        id: route_server.id.clone(),
        name: route_server.name.clone(),
        virtual_router_asn: route_server.asn,
        virtual_router_ips: route_server.router_ips.clone(),
        public_ip_address: public_ip.ip_address.clone(),
        public_ip_id: public_ip.id.clone(),
        tags: requests.route_server.tags.clone(),
        bgp_connection_count: bgp_connections.len(),
        bgp_connections,
        bgp_connection_ids,
    }
}
