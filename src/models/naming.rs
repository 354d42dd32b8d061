//! Naming convention output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name suffix and base tags returned by a naming resolver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNaming {
    pub resource_suffix: String,
    pub tags: BTreeMap<String, String>,
}
