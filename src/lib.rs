//! Azure Route Server desired state compiler.
//!
//! Validates a Route Server configuration, derives names and tags, builds the
//! provider requests and projects the provider results into outputs.
//!
//! Module structure:
//! - [`models`] - Configuration, requests and result types
//! - [`validation`] - Input rules
//! - [`naming`] - Naming and tagging convention
//! - [`processing`] - Request building, deployment and projection
//! - [`azure`] - Provider gateways
//! - [`output`] - Terminal output

pub mod azure;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod output;
pub mod processing;
pub mod validation;

use std::path::Path;
use std::str::FromStr;

pub use error::{Error, PartialDeployment, ProviderError, ResolutionError, ValidationErrors, ValidationFailure};
pub use models::{Configuration, ResourceRequestSet, ResultDocument};
pub use processing::{deploy, plan};

/// Decode a configuration document from JSON, naming the failing path on error.
pub fn parse_configuration(json: &str) -> Result<Configuration, Error> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::Config(format!("path={} error={}", e.path(), e.inner())))
}

/// Read and decode a configuration document.
pub fn read_configuration(path: impl AsRef<Path>) -> Result<Configuration, Error> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?;
    log::info!("Reading configuration: {}", path.display());
    parse_configuration(&json)
}

/// What the binary does with a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print the requests only.
    #[default]
    Plan,
    /// Submit the requests to Azure.
    Apply,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plan" => Ok(Mode::Plan),
            "apply" => Ok(Mode::Apply),
            other => Err(Error::Config(format!(
                "unknown mode '{other}', expected plan or apply"
            ))),
        }
    }
}
