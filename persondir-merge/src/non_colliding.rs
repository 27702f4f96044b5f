use crate::AttributeMerger;
use persondir_types::AttributeMap;

/// Only adds attributes the base does not already have.
///
/// A colliding attribute from the addition is dropped, so the first source
/// to report an attribute owns it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonCollidingMerger;

impl AttributeMerger for NonCollidingMerger {
    fn merge(&self, base: &AttributeMap, addition: &AttributeMap) -> AttributeMap {
        let mut merged = base.clone();
        for (name, values) in addition {
            if !merged.contains(name) {
                merged.insert(name.clone(), values.clone());
            }
        }
        merged
    }
}
