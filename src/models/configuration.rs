//! Route Server configuration document.

use crate::config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity fields handed to the naming convention.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Identity {
    /// Owner contact, usually an email address.
    pub contact: String,
    pub environment: String,
    pub repository: String,
    pub workload: String,
    #[serde(default = "default_instance")]
    pub instance: String,
}

/// Where the resources are deployed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LocationBinding {
    /// Azure region, e.g. `australiaeast`.
    pub location: String,
    pub resource_group_name: String,
}

/// Subnet hosting the Route Server.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SubnetReference {
    /// Full Azure resource id of the subnet.
    pub id: String,
}

/// One BGP peer of the Route Server.
///
/// `peer_asn` is held as `u64` so out of range numbers reach validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PeerConnection {
    pub peer_asn: u64,
    pub peer_ip: String,
}

/// Diagnostic settings binding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct Diagnostics {
    pub enabled: bool,
    #[serde(default)]
    pub log_analytics_workspace_id: Option<String>,
}

impl Diagnostics {
    /// An enabled binding needs a workspace. A disabled one ignores it.
    pub fn check(&self) -> Result<(), String> {
        if self.enabled && self.log_analytics_workspace_id.is_none() {
            return Err(
                "log_analytics_workspace_id must be set when diagnostics are enabled".to_string(),
            );
        }
        Ok(())
    }

    /// Workspace to bind, only when enabled.
    pub fn workspace(&self) -> Option<&str> {
        if self.enabled {
            self.log_analytics_workspace_id.as_deref()
        } else {
            None
        }
    }
}

/// Full input document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub identity: Identity,
    pub location_binding: LocationBinding,
    pub subnet_reference: SubnetReference,
    #[serde(default)]
    pub branch_to_branch_enabled: bool,
    #[serde(default = "default_service_sku")]
    pub service_sku: String,
    #[serde(default)]
    pub peer_connections: BTreeMap<String, PeerConnection>,
    #[serde(default = "default_public_ip_allocation_method")]
    pub public_ip_allocation_method: String,
    #[serde(default = "default_public_ip_sku")]
    pub public_ip_sku: String,
    #[serde(default)]
    pub diagnostics: Diagnostics,
    #[serde(default)]
    pub optional_tags: BTreeMap<String, String>,
}

impl Configuration {
    /// Configuration with every optional field at its default.
    pub fn new(
        identity: Identity,
        location_binding: LocationBinding,
        subnet_id: impl Into<String>,
    ) -> Self {
        Configuration {
            identity,
            location_binding,
            subnet_reference: SubnetReference {
                id: subnet_id.into(),
            },
            branch_to_branch_enabled: false,
            service_sku: default_service_sku(),
            peer_connections: BTreeMap::new(),
            public_ip_allocation_method: default_public_ip_allocation_method(),
            public_ip_sku: default_public_ip_sku(),
            diagnostics: Diagnostics::default(),
            optional_tags: BTreeMap::new(),
        }
    }
}

fn default_instance() -> String {
    config::DEFAULT_INSTANCE.to_string()
}

fn default_service_sku() -> String {
    config::SUPPORTED_SERVICE_SKU.to_string()
}

fn default_public_ip_allocation_method() -> String {
    config::SUPPORTED_PUBLIC_IP_ALLOCATION.to_string()
}

fn default_public_ip_sku() -> String {
    config::SUPPORTED_PUBLIC_IP_SKU.to_string()
}
