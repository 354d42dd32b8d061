//! Naming and tagging convention.
//!
//! The convention is injected through [`NamingResolver`] so deployments can be
//! tested with a fixed suffix and tag set.

use crate::error::ResolutionError;
use crate::models::{Identity, LocationBinding, ResolvedNaming};
use std::collections::BTreeMap;

/// Resolves the resource name suffix and base tags for an identity.
pub trait NamingResolver: Send + Sync {
    fn resolve(
        &self,
        identity: &Identity,
        location: &LocationBinding,
    ) -> Result<ResolvedNaming, ResolutionError>;
}

/// Default convention: `{workload}-{environment}-{location}-{instance}`.
#[derive(Debug, Default, Clone)]
pub struct ConventionNamingResolver;

impl NamingResolver for ConventionNamingResolver {
    fn resolve(
        &self,
        identity: &Identity,
        location: &LocationBinding,
    ) -> Result<ResolvedNaming, ResolutionError> {
        let parts = [
            ("workload", identity.workload.as_str()),
            ("environment", identity.environment.as_str()),
            ("location", location.location.as_str()),
            ("instance", identity.instance.as_str()),
        ];
        let mut segments = Vec::with_capacity(parts.len());
        for (field, value) in parts {
            let segment = normalize(value);
            if segment.is_empty() {
                return Err(ResolutionError::new(format!("{field} is empty")));
            }
            segments.push(segment);
        }
        let resource_suffix = segments.join("-");

        let tags = BTreeMap::from([
            ("contact".to_string(), identity.contact.clone()),
            ("environment".to_string(), identity.environment.clone()),
            ("repository".to_string(), identity.repository.clone()),
            ("workload".to_string(), identity.workload.clone()),
            ("instance".to_string(), identity.instance.clone()),
        ]);

        log::debug!("resolved suffix '{resource_suffix}'");
        Ok(ResolvedNaming {
            resource_suffix,
            tags,
        })
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
