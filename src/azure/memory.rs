//! In-memory [`ProviderGateway`].
//!
//! Behaves like the managed API for the calls this crate makes: generates ids,
//! reports ASN 65515, enforces SKU compatibility between the Route Server and
//! its public IP, and rejects duplicate peering names. Every call is recorded.

use super::gateway::{BgpConnectionCreated, ProviderGateway, PublicIpCreated, RouteServerCreated};
use crate::error::ProviderError;
use crate::models::{BgpConnectionRequest, DiagnosticsRequest, PublicIpRequest, RouteServerRequest};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// ASN Azure assigns to every Route Server.
pub const VIRTUAL_ROUTER_ASN: u32 = 65515;

const SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";

/// A call seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PublicIp(String),
    RouteServer(String),
    BgpConnection(String),
    Diagnostics(String),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    public_ips: BTreeMap<String, PublicIpRequest>,
    peerings: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
    /// Resource name -> error returned when it is created.
    failures: BTreeMap<String, ProviderError>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make creation of the resource called `name` fail with `error`.
    pub fn fail_on(mut self, name: impl Into<String>, error: ProviderError) -> Self {
        self.failures.insert(name.into(), error);
        self
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // Poisoned state is still consistent, every write is a single push/insert.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn injected(&self, name: &str) -> Result<(), ProviderError> {
        match self.failures.get(name) {
            Some(error) => {
                log::warn!("injected failure for {name}: {error}");
                Err(error.clone())
            }
            None => Ok(()),
        }
    }
}

fn resource_id(resource_group: &str, provider_path: &str) -> String {
    format!("/subscriptions/{SUBSCRIPTION_ID}/resourceGroups/{resource_group}/providers/{provider_path}")
}

/// Deterministic address derived from the resource name.
fn address_for(name: &str) -> (u8, u8) {
    let hash = name
        .bytes()
        .fold(0u16, |acc, b| acc.wrapping_mul(31).wrapping_add(u16::from(b)));
    let [hi, lo] = hash.to_be_bytes();
    (hi % 16, lo.max(4))
}

#[async_trait]
impl ProviderGateway for InMemoryGateway {
    async fn create_public_ip(
        &self,
        request: &PublicIpRequest,
    ) -> Result<PublicIpCreated, ProviderError> {
        self.lock().calls.push(Call::PublicIp(request.name.clone()));
        self.injected(&request.name)?;

        let (third, fourth) = address_for(&request.name);
        let id = resource_id(
            &request.resource_group_name,
            &format!("Microsoft.Network/publicIPAddresses/{}", request.name),
        );
        self.lock().public_ips.insert(id.clone(), request.clone());
        Ok(PublicIpCreated {
            id,
            ip_address: format!("20.53.{third}.{fourth}"),
        })
    }

    async fn create_route_server(
        &self,
        request: &RouteServerRequest,
        public_ip_id: &str,
    ) -> Result<RouteServerCreated, ProviderError> {
        self.lock().calls.push(Call::RouteServer(request.name.clone()));
        self.injected(&request.name)?;

        let public_ip = self.lock().public_ips.get(public_ip_id).cloned().ok_or_else(|| {
            ProviderError::new("NotFound", format!("public IP {public_ip_id} does not exist"))
        })?;
        if public_ip.sku != request.sku {
            return Err(ProviderError::new(
                "SkuMismatch",
                format!(
                    "Route Server SKU {} requires a {} public IP, got {}",
                    request.sku, request.sku, public_ip.sku
                ),
            ));
        }

        Ok(RouteServerCreated {
            id: resource_id(
                &request.resource_group_name,
                &format!("Microsoft.Network/virtualHubs/{}", request.name),
            ),
            name: request.name.clone(),
            asn: VIRTUAL_ROUTER_ASN,
            router_ips: ["10.0.255.4".to_string(), "10.0.255.5".to_string()],
        })
    }

    async fn create_bgp_connection(
        &self,
        request: &BgpConnectionRequest,
        route_server_id: &str,
    ) -> Result<BgpConnectionCreated, ProviderError> {
        self.lock()
            .calls
            .push(Call::BgpConnection(request.name.clone()));
        self.injected(&request.name)?;

        if !self.lock().peerings.insert(request.name.clone()) {
            return Err(ProviderError::new(
                "Conflict",
                format!("peering {} already exists", request.name),
            ));
        }
        Ok(BgpConnectionCreated {
            id: format!("{route_server_id}/bgpConnections/{}", request.name),
            name: request.name.clone(),
        })
    }

    async fn bind_diagnostics(
        &self,
        request: &DiagnosticsRequest,
        _route_server_id: &str,
    ) -> Result<(), ProviderError> {
        self.lock().calls.push(Call::Diagnostics(request.name.clone()));
        self.injected(&request.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_ip(sku: &str) -> PublicIpRequest {
        PublicIpRequest {
            name: "pip-hub".to_string(),
            location: "australiaeast".to_string(),
            resource_group_name: "rg-hub".to_string(),
            allocation_method: "Static".to_string(),
            sku: sku.to_string(),
            tags: BTreeMap::new(),
        }
    }

    fn route_server() -> RouteServerRequest {
        RouteServerRequest {
            name: "rs-hub".to_string(),
            location: "australiaeast".to_string(),
            resource_group_name: "rg-hub".to_string(),
            sku: "Standard".to_string(),
            branch_to_branch_enabled: false,
            subnet_id: "/subnets/RouteServerSubnet".to_string(),
            public_ip_name: "pip-hub".to_string(),
            tags: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_route_server_created() {
        let gateway = InMemoryGateway::new();
        let pip = gateway.create_public_ip(&public_ip("Standard")).await.expect("pip");
        assert!(pip.id.ends_with("/publicIPAddresses/pip-hub"));

        let rs = gateway
            .create_route_server(&route_server(), &pip.id)
            .await
            .expect("route server");
        assert_eq!(rs.asn, VIRTUAL_ROUTER_ASN);
        assert_eq!(rs.name, "rs-hub");
        assert_eq!(
            gateway.calls(),
            vec![
                Call::PublicIp("pip-hub".to_string()),
                Call::RouteServer("rs-hub".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_sku_mismatch() {
        let gateway = InMemoryGateway::new();
        let pip = gateway.create_public_ip(&public_ip("Basic")).await.expect("pip");
        let err = gateway
            .create_route_server(&route_server(), &pip.id)
            .await
            .expect_err("sku mismatch");
        assert_eq!(err.code, "SkuMismatch");
    }

    #[tokio::test]
    async fn test_unknown_public_ip() {
        let err = InMemoryGateway::new()
            .create_route_server(&route_server(), "/missing")
            .await
            .expect_err("no public ip");
        assert_eq!(err.code, "NotFound");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let gateway = InMemoryGateway::new()
            .fail_on("pip-hub", ProviderError::new("QuotaExceeded", "no more IPs"));
        let err = gateway
            .create_public_ip(&public_ip("Standard"))
            .await
            .expect_err("injected");
        assert_eq!(err.code, "QuotaExceeded");
        assert_eq!(gateway.calls().len(), 1);
    }

    #[test]
    fn test_address_is_stable() {
        assert_eq!(address_for("pip-hub"), address_for("pip-hub"));
        assert!(address_for("pip-hub").0 < 16);
    }
}
