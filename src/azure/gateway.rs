//! Provider gateway contract.
//!
//! Executes creation requests against the managed cloud API. Implementations
//! own retries and timeouts; callers treat every error as final.

use crate::error::ProviderError;
use crate::models::{BgpConnectionRequest, DiagnosticsRequest, PublicIpRequest, RouteServerRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Created public IP address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicIpCreated {
    pub id: String,
    pub ip_address: String,
}

/// Created Route Server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RouteServerCreated {
    pub id: String,
    pub name: String,
    pub asn: u32,
    pub router_ips: [String; 2],
}

/// Created BGP peering.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BgpConnectionCreated {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait ProviderGateway: Send + Sync {
    async fn create_public_ip(
        &self,
        request: &PublicIpRequest,
    ) -> Result<PublicIpCreated, ProviderError>;

    /// `public_ip_id` is the id returned for `request.public_ip_name`.
    async fn create_route_server(
        &self,
        request: &RouteServerRequest,
        public_ip_id: &str,
    ) -> Result<RouteServerCreated, ProviderError>;

    /// `route_server_id` is the id returned for `request.route_server_name`.
    async fn create_bgp_connection(
        &self,
        request: &BgpConnectionRequest,
        route_server_id: &str,
    ) -> Result<BgpConnectionCreated, ProviderError>;

    async fn bind_diagnostics(
        &self,
        request: &DiagnosticsRequest,
        route_server_id: &str,
    ) -> Result<(), ProviderError>;
}
