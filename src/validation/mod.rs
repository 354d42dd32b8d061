//! Input validation.
//!
//! Runs every rule in [`rules::RULES`] against a configuration and collects all
//! failures, so a single run reports everything that needs fixing.

mod rules;

pub use rules::{is_ipv4_syntax, is_route_server_subnet, is_valid_asn, Rule, RULES};

use crate::error::{ValidationErrors, ValidationFailure};
use crate::models::Configuration;

/// A configuration that passed every rule.
#[derive(Debug, Clone, Copy)]
pub struct Accepted<'a>(&'a Configuration);

impl<'a> Accepted<'a> {
    pub fn config(&self) -> &'a Configuration {
        self.0
    }
}

/// Validate a configuration against all rules.
///
/// # Returns
/// * `Ok(Accepted)` - The configuration is accepted
/// * `Err(ValidationErrors)` - One entry per violation, in rule order
pub fn validate(config: &Configuration) -> Result<Accepted<'_>, ValidationErrors> {
    let failures: Vec<ValidationFailure> = RULES
        .iter()
        .flat_map(|rule| {
            let mut failures = (rule.check)(config);
            log::trace!("rule {} -> {} failure(s)", rule.name, failures.len());
            for failure in &mut failures {
                failure.rule = rule.name.to_string();
            }
            failures
        })
        .collect();

    if failures.is_empty() {
        log::debug!("configuration accepted");
        Ok(Accepted(config))
    } else {
        for failure in &failures {
            log::warn!("rejected {failure}");
        }
        Err(ValidationErrors(failures))
    }
}
