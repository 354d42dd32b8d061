//! Crate wide constants.
//!
//! Platform limits and the single configuration values the managed Route Server
//! currently supports.

/// Maximum number of BGP peer connections a Route Server accepts.
pub const MAX_BGP_CONNECTIONS: usize = 8;

/// Subnet name Azure requires for the Route Server hosted subnet.
pub const ROUTE_SERVER_SUBNET_NAME: &str = "RouteServerSubnet";

/// Only supported Route Server SKU.
pub const SUPPORTED_SERVICE_SKU: &str = "Standard";

/// Only supported public IP allocation method.
pub const SUPPORTED_PUBLIC_IP_ALLOCATION: &str = "Static";

/// Only supported public IP SKU.
pub const SUPPORTED_PUBLIC_IP_SKU: &str = "Standard";

/// Default identity instance.
pub const DEFAULT_INSTANCE: &str = "0";

/// Resource name prefixes.
pub const PUBLIC_IP_PREFIX: &str = "pip-";
pub const ROUTE_SERVER_PREFIX: &str = "rs-";
pub const BGP_CONNECTION_PREFIX: &str = "bgp-";
pub const DIAGNOSTICS_PREFIX: &str = "diag-";

/// Environment variables read by the binary.
pub const ENV_CONFIG_PATH: &str = "ROUTE_SERVER_CONFIG";
pub const ENV_MODE: &str = "ROUTE_SERVER_MODE";
pub const ENV_AZ_CLI: &str = "AZ_CLI";

pub const DEFAULT_CONFIG_PATH: &str = "route_server.json";
pub const DEFAULT_AZ_CLI: &str = "az";

/// Refuse CLI responses larger than this.
pub const MAX_CLI_OUTPUT_BYTES: usize = 500_000;
