use crate::AttributeMerger;
use persondir_types::AttributeMap;

/// Accumulates values of colliding attributes.
///
/// For `{a: [2]}` merged with `{a: [1]}` the result is `{a: [2, 1]}`: the
/// base's values come first, duplicates are kept and order is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultivaluedMerger;

impl AttributeMerger for MultivaluedMerger {
    fn merge(&self, base: &AttributeMap, addition: &AttributeMap) -> AttributeMap {
        let mut merged = base.clone();
        for (name, values) in addition {
            merged.extend_values(name, values.iter().cloned());
        }
        merged
    }
}
