//! Externally visible result of a deployment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detail of one created BGP connection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BgpConnectionOutput {
    pub id: String,
    pub name: String,
    pub peer_asn: u32,
    pub peer_ip: String,
}

/// Outputs of a successful deployment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultDocument {
    /// Route Server resource id.
    pub id: String,
    pub name: String,
    /// As reported by the provider (65515 on Azure).
    pub virtual_router_asn: u32,
    pub virtual_router_ips: [String; 2],
    pub public_ip_address: String,
    pub public_ip_id: String,
    pub tags: BTreeMap<String, String>,
    pub bgp_connections: BTreeMap<String, BgpConnectionOutput>,
    pub bgp_connection_ids: BTreeMap<String, String>,
    pub bgp_connection_count: usize,
}
