//! Tag merging.

use std::collections::BTreeMap;

/// Naming tags first, then `optional` overlaid on top.
pub fn merge_tags(
    naming: &BTreeMap<String, String>,
    optional: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    naming
        .iter()
        .chain(optional.iter())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
