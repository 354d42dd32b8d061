//! Integration tests for azure-route-server
//!
//! These tests run the complete flow from configuration document to result
//! document against the in-memory gateway.

use azure_route_server::azure::{Call, InMemoryGateway};
use azure_route_server::models::{Identity, LocationBinding, PeerConnection, ResolvedNaming};
use azure_route_server::naming::{ConventionNamingResolver, NamingResolver};
use azure_route_server::{deploy, plan, read_configuration, Error, ProviderError, ResolutionError};
use std::collections::BTreeMap;

struct StubNaming;

impl NamingResolver for StubNaming {
    fn resolve(
        &self,
        _identity: &Identity,
        _location: &LocationBinding,
    ) -> Result<ResolvedNaming, ResolutionError> {
        Ok(ResolvedNaming {
            resource_suffix: "hub-prd-aue-001".to_string(),
            tags: BTreeMap::from([
                ("environment".to_string(), "prd".to_string()),
                ("cost-center".to_string(), "0000".to_string()),
            ]),
        })
    }
}

#[tokio::test]
async fn test_full_workflow_with_fixture() {
    let config = read_configuration("src/tests/test_data/route_server_full.json")
        .expect("Failed to read configuration");
    let gateway = InMemoryGateway::new();

    let result = deploy(&config, &StubNaming, &gateway)
        .await
        .expect("Deployment failed");

    assert_eq!(result.name, "rs-hub-prd-aue-001");
    assert_eq!(result.virtual_router_asn, 65515);
    assert_eq!(result.bgp_connection_count, 2);
    assert_eq!(result.bgp_connections["fortigate-primary"].peer_asn, 65001);
    assert_eq!(result.bgp_connections["fortigate-primary"].peer_ip, "10.100.1.4");
    assert_eq!(result.bgp_connections["fortigate-secondary"].name, "bgp-fortigate-secondary");
    assert_eq!(
        result.bgp_connection_ids["fortigate-primary"],
        result.bgp_connections["fortigate-primary"].id
    );
    assert!(result.public_ip_id.ends_with("/publicIPAddresses/pip-hub-prd-aue-001"));
    assert!(!result.public_ip_address.is_empty());

    // optional_tags overlay the naming tags
    assert_eq!(result.tags["cost-center"], "1234");
    assert_eq!(result.tags["environment"], "prd");

    let diagnostics_calls = gateway
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Diagnostics(_)))
        .count();
    assert_eq!(diagnostics_calls, 1);
}

#[tokio::test]
async fn test_invalid_fixture_reports_everything() {
    let config = read_configuration("src/tests/test_data/route_server_invalid.json")
        .expect("Failed to read configuration");
    let gateway = InMemoryGateway::new();

    let err = deploy(&config, &StubNaming, &gateway)
        .await
        .expect_err("Invalid configuration was accepted");
    let errors = match err {
        Error::Validation(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };

    for rule in [
        "subnet_name",
        "service_sku",
        "peer_asn_range",
        "peer_ip_format",
        "public_ip_allocation_method",
        "public_ip_sku",
        "diagnostics_workspace",
    ] {
        assert!(errors.has_rule(rule), "missing {rule} in {errors}");
    }
    // both peers have an out of range ASN
    assert_eq!(
        errors
            .failures()
            .iter()
            .filter(|f| f.rule == "peer_asn_range")
            .count(),
        2
    );
    assert!(gateway.calls().is_empty(), "No provider call on invalid input");
}

#[tokio::test]
async fn test_failed_peering_keeps_created_resources() {
    let config = read_configuration("src/tests/test_data/route_server_full.json")
        .expect("Failed to read configuration");
    let gateway = InMemoryGateway::new().fail_on(
        "bgp-fortigate-secondary",
        ProviderError::new("Conflict", "peer ip already used"),
    );

    let err = deploy(&config, &StubNaming, &gateway)
        .await
        .expect_err("Peering failure was not reported");
    let partial = match err {
        Error::Partial(partial) => partial,
        other => panic!("expected partial deployment, got {other:?}"),
    };

    let failed: Vec<&str> = partial.bgp_failures.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(failed, vec!["fortigate-secondary"]);
    assert!(partial.diagnostics_failure.is_none());

    assert_eq!(partial.result.name, "rs-hub-prd-aue-001");
    assert_eq!(partial.result.bgp_connection_count, 1);
    assert!(partial.result.bgp_connection_ids["fortigate-primary"]
        .ends_with("/bgpConnections/bgp-fortigate-primary"));
    assert!(!partial.result.bgp_connection_ids.contains_key("fortigate-secondary"));
    assert!(gateway
        .calls()
        .contains(&Call::Diagnostics("diag-hub-prd-aue-001".to_string())));
}

#[tokio::test]
async fn test_no_connections() {
    let mut config = read_configuration("src/tests/test_data/route_server_full.json")
        .expect("Failed to read configuration");
    config.peer_connections.clear();
    config.diagnostics.enabled = false;

    let gateway = InMemoryGateway::new();
    let result = deploy(&config, &StubNaming, &gateway)
        .await
        .expect("Deployment failed");

    assert_eq!(result.bgp_connection_count, 0);
    assert!(result.bgp_connections.is_empty());
    assert!(result.bgp_connection_ids.is_empty());
    assert_eq!(gateway.calls().len(), 2);
}

#[tokio::test]
async fn test_eight_connections_is_the_limit() {
    let mut config = read_configuration("src/tests/test_data/route_server_full.json")
        .expect("Failed to read configuration");
    config.peer_connections = (1..=8)
        .map(|i| {
            (
                format!("nva-{i}"),
                PeerConnection {
                    peer_asn: 4_200_000_000,
                    peer_ip: format!("10.100.1.{i}"),
                },
            )
        })
        .collect();

    let result = deploy(&config, &StubNaming, &InMemoryGateway::new())
        .await
        .expect("Eight connections should deploy");
    assert_eq!(result.bgp_connection_count, 8);

    config.peer_connections.insert(
        "nva-9".to_string(),
        PeerConnection {
            peer_asn: 65001,
            peer_ip: "10.100.1.9".to_string(),
        },
    );
    let err = deploy(&config, &StubNaming, &InMemoryGateway::new())
        .await
        .expect_err("Nine connections should be rejected");
    assert!(matches!(err, Error::Validation(ref e) if e.has_rule("bgp_connection_limit")));
}

#[test]
fn test_plan_is_repeatable() {
    let config = read_configuration("src/tests/test_data/route_server_full.json")
        .expect("Failed to read configuration");
    let first = plan(&config, &ConventionNamingResolver).expect("plan");
    let second = plan(&config, &ConventionNamingResolver).expect("plan");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).expect("serialize"),
        serde_json::to_vec(&second).expect("serialize")
    );
    assert_eq!(first.route_server.name, "rs-hub-prd-australiaeast-0");
    assert_eq!(first.request_count(), 5);
}
