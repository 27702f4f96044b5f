use crate::AttributeMerger;
use persondir_types::AttributeMap;

/// Lets the addition win every collision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplacingMerger;

impl AttributeMerger for ReplacingMerger {
    fn merge(&self, base: &AttributeMap, addition: &AttributeMap) -> AttributeMap {
        let mut merged = base.clone();
        for (name, values) in addition {
            merged.insert(name.clone(), values.clone());
        }
        merged
    }
}
