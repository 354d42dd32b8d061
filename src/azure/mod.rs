//! Azure provider interaction.
//!
//! - [`gateway`] - Provider gateway contract
//! - [`cli`] - Azure CLI command execution
//! - [`az_gateway`] - Gateway backed by the Azure CLI
//! - [`memory`] - In-memory gateway

mod az_gateway;
mod cli;
mod gateway;
mod memory;

// Re-export public types and functions
pub use az_gateway::AzCliGateway;
pub use cli::{decode, AzCommand, CODE_CLI_ERROR, CODE_INVALID_RESPONSE};
pub use gateway::{BgpConnectionCreated, ProviderGateway, PublicIpCreated, RouteServerCreated};
pub use memory::{Call, InMemoryGateway, VIRTUAL_ROUTER_ASN};
