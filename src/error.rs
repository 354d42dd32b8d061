//! Error types for validation, naming and provider calls.

use crate::models::ResultDocument;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One violated input rule.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Path of the offending field, e.g. `peer_connections["a"].peer_ip`.
    pub field: String,
    /// Short rule name, e.g. `peer_ip_format`.
    pub rule: String,
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.field, self.message, self.rule)
    }
}

/// Every failure found in one configuration. Never empty.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{} validation failure(s):\n  {}", .0.len(), .0.iter().join("\n  "))]
pub struct ValidationErrors(pub Vec<ValidationFailure>);

impl ValidationErrors {
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.0
    }

    /// True if any failure was raised by `rule`.
    pub fn has_rule(&self, rule: &str) -> bool {
        self.0.iter().any(|f| f.rule == rule)
    }
}

/// Naming resolver failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("naming resolution failed: {message}")]
pub struct ResolutionError {
    pub message: String,
}

impl ResolutionError {
    pub fn new(message: impl Into<String>) -> Self {
        ResolutionError {
            message: message.into(),
        }
    }
}

/// Error returned by the provider for a single resource.
#[derive(thiserror::Error, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Top level error of a deployment.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// The public IP or the Route Server failed, nothing depending on it was
    /// attempted.
    #[error("provider failed creating {resource}: {source}")]
    Provider {
        resource: String,
        source: ProviderError,
    },
    /// The Route Server exists but a peering or the diagnostics binding failed.
    #[error(transparent)]
    Partial(Box<PartialDeployment>),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Outcome of a deployment that got past the Route Server but not all the way.
///
/// `result` lists what was created, so the resources are not lost to the
/// caller. Failed peerings are missing from `result.bgp_connections`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{} partially deployed{}{}",
    .result.name,
    format_bgp_failures(.bgp_failures),
    format_diagnostics_failure(.diagnostics_failure)
)]
pub struct PartialDeployment {
    pub result: ResultDocument,
    /// Connection key -> provider error.
    pub bgp_failures: Vec<(String, ProviderError)>,
    pub diagnostics_failure: Option<ProviderError>,
}

fn format_bgp_failures(failures: &[(String, ProviderError)]) -> String {
    if failures.is_empty() {
        return String::new();
    }
    format!(
        ", {} BGP connection(s) failed: {}",
        failures.len(),
        failures
            .iter()
            .map(|(key, e)| format!("{key} ({e})"))
            .join(", ")
    )
}

fn format_diagnostics_failure(failure: &Option<ProviderError>) -> String {
    failure
        .as_ref()
        .map(|e| format!(", diagnostics failed: {e}"))
        .unwrap_or_default()
}
