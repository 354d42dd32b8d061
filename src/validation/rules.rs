//! Individual input rules.
//!
//! Each rule inspects the whole configuration and returns zero or more
//! failures. Rules never depend on each other. A check leaves `rule` empty,
//! [`super::validate`] fills it in from the table entry.

use crate::config;
use crate::error::ValidationFailure;
use crate::models::Configuration;
use regex::Regex;
use std::sync::OnceLock;

/// A named predicate over the configuration.
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&Configuration) -> Vec<ValidationFailure>,
}

/// All rules in evaluation order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "subnet_name",
        check: check_subnet_name,
    },
    Rule {
        name: "service_sku",
        check: check_service_sku,
    },
    Rule {
        name: "bgp_connection_limit",
        check: check_connection_limit,
    },
    Rule {
        name: "peer_asn_range",
        check: check_peer_asn,
    },
    Rule {
        name: "peer_ip_format",
        check: check_peer_ip,
    },
    Rule {
        name: "public_ip_allocation_method",
        check: check_public_ip_allocation,
    },
    Rule {
        name: "public_ip_sku",
        check: check_public_ip_sku,
    },
    Rule {
        name: "diagnostics_workspace",
        check: check_diagnostics,
    },
];

static SUBNET_REGEX: OnceLock<Regex> = OnceLock::new();
static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_subnet_regex() -> &'static Regex {
    SUBNET_REGEX.get_or_init(|| {
        Regex::new(&format!("{}$", config::ROUTE_SERVER_SUBNET_NAME)).expect("Invalid Regex")
    })
}

// Octets are not range checked, `999.999.999.999` is accepted.
fn get_ipv4_regex() -> &'static Regex {
    IPV4_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9]{1,3}\.){3}[0-9]{1,3}$").expect("Invalid Regex")
    })
}

/// Subnet id ends with `RouteServerSubnet`.
pub fn is_route_server_subnet(subnet_id: &str) -> bool {
    get_subnet_regex().is_match(subnet_id)
}

/// Four dot separated groups of one to three digits.
pub fn is_ipv4_syntax(ip: &str) -> bool {
    get_ipv4_regex().is_match(ip)
}

/// ASN fits in 32 bits and is not zero.
pub fn is_valid_asn(asn: u64) -> bool {
    (1..=u64::from(u32::MAX)).contains(&asn)
}

fn failure(field: impl Into<String>, message: impl Into<String>) -> ValidationFailure {
    ValidationFailure {
        field: field.into(),
        rule: String::new(),
        message: message.into(),
    }
}

fn fixed_value(field: &str, value: &str, accepted: &str) -> Vec<ValidationFailure> {
    if value == accepted {
        vec![]
    } else {
        vec![failure(
            field,
            format!("'{value}' is not supported, the only accepted value is '{accepted}'"),
        )]
    }
}

fn check_subnet_name(config: &Configuration) -> Vec<ValidationFailure> {
    if is_route_server_subnet(&config.subnet_reference.id) {
        vec![]
    } else {
        vec![failure(
            "subnet_reference.id",
            format!(
                "the subnet must be named '{}', got '{}'",
                config::ROUTE_SERVER_SUBNET_NAME,
                config.subnet_reference.id
            ),
        )]
    }
}

fn check_service_sku(config: &Configuration) -> Vec<ValidationFailure> {
    fixed_value(
        "service_sku",
        &config.service_sku,
        config::SUPPORTED_SERVICE_SKU,
    )
}

fn check_connection_limit(config: &Configuration) -> Vec<ValidationFailure> {
    let count = config.peer_connections.len();
    if count <= config::MAX_BGP_CONNECTIONS {
        vec![]
    } else {
        vec![failure(
            "peer_connections",
            format!(
                "{count} connections configured, a Route Server supports at most {}",
                config::MAX_BGP_CONNECTIONS
            ),
        )]
    }
}

fn check_peer_asn(config: &Configuration) -> Vec<ValidationFailure> {
    config
        .peer_connections
        .iter()
        .filter(|(_, peer)| !is_valid_asn(peer.peer_asn))
        .map(|(key, peer)| {
            failure(
                format!("peer_connections[\"{key}\"].peer_asn"),
                format!(
                    "peer_asn {} is outside 1..={}",
                    peer.peer_asn,
                    u32::MAX
                ),
            )
        })
        .collect()
}

fn check_peer_ip(config: &Configuration) -> Vec<ValidationFailure> {
    config
        .peer_connections
        .iter()
        .filter(|(_, peer)| !is_ipv4_syntax(&peer.peer_ip))
        .map(|(key, peer)| {
            failure(
                format!("peer_connections[\"{key}\"].peer_ip"),
                format!("peer_ip '{}' is not an IPv4 address", peer.peer_ip),
            )
        })
        .collect()
}

fn check_public_ip_allocation(config: &Configuration) -> Vec<ValidationFailure> {
    fixed_value(
        "public_ip_allocation_method",
        &config.public_ip_allocation_method,
        config::SUPPORTED_PUBLIC_IP_ALLOCATION,
    )
}

fn check_public_ip_sku(config: &Configuration) -> Vec<ValidationFailure> {
    fixed_value(
        "public_ip_sku",
        &config.public_ip_sku,
        config::SUPPORTED_PUBLIC_IP_SKU,
    )
}

fn check_diagnostics(config: &Configuration) -> Vec<ValidationFailure> {
    match config.diagnostics.check() {
        Ok(()) => vec![],
        Err(message) => vec![failure(
            "diagnostics.log_analytics_workspace_id",
            message,
        )],
    }
}
