use persondir_types::{AttributeMap, Person};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Combines two attribute maps into a new one.
///
/// Implementations carry no mutable state; the same merger is shared by
/// every query an engine runs.
pub trait AttributeMerger: Debug + Send + Sync {
    /// Folds `addition` into `base`, returning a new map.
    fn merge(&self, base: &AttributeMap, addition: &AttributeMap) -> AttributeMap;

    /// Combines two declared attribute-name sets.
    ///
    /// The default is set union. This is a declaration only: it does not have
    /// to match the names a real [`merge`](Self::merge) produces.
    fn merge_possible_names(
        &self,
        base: &BTreeSet<String>,
        addition: &BTreeSet<String>,
    ) -> BTreeSet<String> {
        base.union(addition).cloned().collect()
    }

    /// Merges two result sets of people.
    ///
    /// People sharing an identity have their attributes merged with
    /// [`merge`](Self::merge); the rest of `addition` is appended in order.
    fn merge_people(&self, base: &[Person], addition: &[Person]) -> Vec<Person> {
        let mut merged = base.to_vec();
        for person in addition {
            match merged.iter_mut().find(|p| p.identity == person.identity) {
                Some(existing) => {
                    existing.attributes = self.merge(&existing.attributes, &person.attributes);
                }
                None => merged.push(person.clone()),
            }
        }
        merged
    }
}
