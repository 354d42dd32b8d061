//! Deployment flow.
//!
//! validate -> resolve naming -> build requests -> public IP -> Route Server ->
//! BGP connections (concurrent) -> diagnostics -> project outputs.
//!
//! Public IP and Route Server failures stop the run. Once the Route Server
//! exists, peerings and diagnostics are always attempted and their failures
//! are reported together with what was created. There is no rollback.

use super::builder::build_requests;
use super::projector::project;
use crate::azure::{BgpConnectionCreated, ProviderGateway};
use crate::error::{Error, PartialDeployment, ProviderError};
use crate::models::{Configuration, ResourceRequestSet, ResultDocument};
use crate::naming::NamingResolver;
use crate::validation::validate;
use colored::Colorize;
use futures::future::join_all;
use std::collections::BTreeMap;

/// Validate, resolve naming and build the request set without calling the
/// provider.
pub fn plan(
    config: &Configuration,
    resolver: &dyn NamingResolver,
) -> Result<ResourceRequestSet, Error> {
    let accepted = validate(config)?;
    let naming = resolver.resolve(&config.identity, &config.location_binding)?;
    Ok(build_requests(accepted, &naming))
}

/// Run the whole deployment against `gateway`.
///
/// # Returns
/// * `Ok(ResultDocument)` - Every resource was created
/// * `Err(Error::Partial)` - Route Server created, some dependents failed
/// * `Err(Error)` - Validation, naming, public IP or Route Server failure
pub async fn deploy(
    config: &Configuration,
    resolver: &dyn NamingResolver,
    gateway: &dyn ProviderGateway,
) -> Result<ResultDocument, Error> {
    let requests = plan(config, resolver)?;
    log::info!(
        "#Start deploy() {} request(s) for {}",
        requests.request_count(),
        requests.route_server.name.on_blue()
    );

    let public_ip = gateway
        .create_public_ip(&requests.public_ip)
        .await
        .map_err(|e| provider_error(&requests.public_ip.name, e))?;
    log::info!("created {} ({})", requests.public_ip.name, public_ip.ip_address);

    let route_server = gateway
        .create_route_server(&requests.route_server, &public_ip.id)
        .await
        .map_err(|e| provider_error(&requests.route_server.name, e))?;
    log::info!(
        "created {} asn={} ips={:?}",
        route_server.name,
        route_server.asn,
        route_server.router_ips
    );

    let (connections, bgp_failures) =
        create_connections(&requests, &route_server.id, gateway).await;

    let mut diagnostics_failure = None;
    if let Some(diagnostics) = &requests.diagnostics {
        match gateway.bind_diagnostics(diagnostics, &route_server.id).await {
            Ok(()) => log::info!("bound {}", diagnostics.name),
            Err(e) => {
                log::warn!("{} binding {}: {e}", "failed".on_red(), diagnostics.name);
                diagnostics_failure = Some(e);
            }
        }
    }

    let result = project(&requests, &public_ip, &route_server, &connections);
    if !bgp_failures.is_empty() || diagnostics_failure.is_some() {
        let partial = PartialDeployment {
            result,
            bgp_failures,
            diagnostics_failure,
        };
        log::warn!("#End deploy() {partial}");
        return Err(Error::Partial(Box::new(partial)));
    }

    log::info!(
        "#End deploy() {} with {} BGP connection(s)",
        result.name,
        result.bgp_connection_count
    );
    Ok(result)
}

/// Create every peering concurrently.
///
/// # Returns
/// Created peerings and the failed ones, both keyed by connection key.
async fn create_connections(
    requests: &ResourceRequestSet,
    route_server_id: &str,
    gateway: &dyn ProviderGateway,
) -> (
    BTreeMap<String, BgpConnectionCreated>,
    Vec<(String, ProviderError)>,
) {
    let pending = requests.bgp_connections.iter().map(|(key, request)| async move {
        let result = gateway.create_bgp_connection(request, route_server_id).await;
        (key.clone(), result)
    });

    let mut created = BTreeMap::new();
    let mut failed = Vec::new();
    for (key, result) in join_all(pending).await {
        match result {
            Ok(connection) => {
                log::info!("created {}", connection.name);
                created.insert(key, connection);
            }
            Err(e) => {
                log::warn!("{} BGP connection {key}: {e}", "failed".on_red());
                failed.push((key, e));
            }
        }
    }

    (created, failed)
}

fn provider_error(resource: &str, source: ProviderError) -> Error {
    log::warn!("{} creating {resource}: {source}", "failed".on_red());
    Error::Provider {
        resource: resource.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::azure::{Call, InMemoryGateway};
    use crate::error::ResolutionError;
    use crate::models::{Identity, LocationBinding, PeerConnection, ResolvedNaming};

    struct FixedNaming;

    impl NamingResolver for FixedNaming {
        fn resolve(
            &self,
            _identity: &Identity,
            _location: &LocationBinding,
        ) -> Result<ResolvedNaming, ResolutionError> {
            Ok(ResolvedNaming {
                resource_suffix: "hub".to_string(),
                tags: BTreeMap::from([("environment".to_string(), "prd".to_string())]),
            })
        }
    }

    struct BrokenNaming;

    impl NamingResolver for BrokenNaming {
        fn resolve(
            &self,
            _identity: &Identity,
            _location: &LocationBinding,
        ) -> Result<ResolvedNaming, ResolutionError> {
            Err(ResolutionError::new("naming service unavailable"))
        }
    }

    fn sample() -> Configuration {
        let mut config = Configuration::new(
            Identity {
                contact: "netops@example.com".to_string(),
                environment: "prd".to_string(),
                repository: "network-hub".to_string(),
                workload: "hub".to_string(),
                instance: "0".to_string(),
            },
            LocationBinding {
                location: "australiaeast".to_string(),
                resource_group_name: "rg-hub".to_string(),
            },
            "/subscriptions/1111/resourceGroups/rg-hub/providers/Microsoft.Network/virtualNetworks/vnet-hub/subnets/RouteServerSubnet",
        );
        for (key, ip) in [("nva-a", "10.100.1.4"), ("nva-b", "10.100.1.5")] {
            config.peer_connections.insert(
                key.to_string(),
                PeerConnection {
                    peer_asn: 65001,
                    peer_ip: ip.to_string(),
                },
            );
        }
        config
    }

    #[tokio::test]
    async fn test_call_order() {
        let mut config = sample();
        config.diagnostics.enabled = true;
        config.diagnostics.log_analytics_workspace_id = Some("/ws".to_string());
        let gateway = InMemoryGateway::new();

        let result = deploy(&config, &FixedNaming, &gateway).await.expect("deployed");
        assert_eq!(result.bgp_connection_count, 2);

        let calls = gateway.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], Call::PublicIp("pip-hub".to_string()));
        assert_eq!(calls[1], Call::RouteServer("rs-hub".to_string()));
        assert!(calls[2..4].contains(&Call::BgpConnection("bgp-nva-a".to_string())));
        assert!(calls[2..4].contains(&Call::BgpConnection("bgp-nva-b".to_string())));
        assert_eq!(calls[4], Call::Diagnostics("diag-hub".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_config_makes_no_calls() {
        let mut config = sample();
        config.service_sku = "Basic".to_string();
        let gateway = InMemoryGateway::new();
        let err = deploy(&config, &FixedNaming, &gateway).await.expect_err("invalid");
        assert!(matches!(err, Error::Validation(ref v) if v.has_rule("service_sku")));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolution_error_surfaces() {
        let gateway = InMemoryGateway::new();
        let err = deploy(&sample(), &BrokenNaming, &gateway).await.expect_err("naming");
        assert!(matches!(err, Error::Resolution(_)));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_route_server_failure_blocks_dependents() {
        let gateway = InMemoryGateway::new()
            .fail_on("rs-hub", ProviderError::new("InternalError", "try later"));
        let err = deploy(&sample(), &FixedNaming, &gateway).await.expect_err("blocked");
        match err {
            Error::Provider { resource, source } => {
                assert_eq!(resource, "rs-hub");
                assert_eq!(source.code, "InternalError");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_connection_failure() {
        let mut config = sample();
        config.diagnostics.enabled = true;
        config.diagnostics.log_analytics_workspace_id = Some("/ws".to_string());
        let gateway = InMemoryGateway::new()
            .fail_on("bgp-nva-a", ProviderError::new("Conflict", "peer ip in use"));

        let err = deploy(&config, &FixedNaming, &gateway).await.expect_err("partial");
        let partial = match err {
            Error::Partial(partial) => partial,
            other => panic!("unexpected error {other:?}"),
        };
        assert_eq!(partial.bgp_failures.len(), 1);
        assert_eq!(partial.bgp_failures[0].0, "nva-a");
        assert_eq!(partial.bgp_failures[0].1.code, "Conflict");
        assert!(partial.diagnostics_failure.is_none());

        // what was created is still reported
        let result = &partial.result;
        assert!(result.public_ip_id.ends_with("/publicIPAddresses/pip-hub"));
        assert!(result.id.ends_with("/virtualHubs/rs-hub"));
        assert_eq!(result.bgp_connection_count, 1);
        assert!(result.bgp_connection_ids["nva-b"].ends_with("/bgpConnections/bgp-nva-b"));
        assert!(!result.bgp_connections.contains_key("nva-a"));

        let calls = gateway.calls();
        assert!(calls.contains(&Call::BgpConnection("bgp-nva-b".to_string())));
        assert_eq!(calls.last(), Some(&Call::Diagnostics("diag-hub".to_string())));
    }

    #[tokio::test]
    async fn test_diagnostics_failure_is_partial() {
        let mut config = sample();
        config.diagnostics.enabled = true;
        config.diagnostics.log_analytics_workspace_id = Some("/ws".to_string());
        let gateway = InMemoryGateway::new()
            .fail_on("diag-hub", ProviderError::new("Forbidden", "no access to workspace"));

        let err = deploy(&config, &FixedNaming, &gateway).await.expect_err("partial");
        let partial = match err {
            Error::Partial(partial) => partial,
            other => panic!("unexpected error {other:?}"),
        };
        assert!(partial.bgp_failures.is_empty());
        assert_eq!(
            partial.diagnostics_failure.as_ref().map(|e| e.code.as_str()),
            Some("Forbidden")
        );
        assert_eq!(partial.result.bgp_connection_count, 2);
    }

    #[test]
    fn test_plan_without_provider() {
        let requests = plan(&sample(), &FixedNaming).expect("planned");
        assert_eq!(requests.request_count(), 4);
        assert_eq!(requests.route_server.tags["environment"], "prd");
    }
}
