use crate::{AttributeMap, AttributeValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cache key derived from a subset of a query seed.
///
/// Keys are sorted by attribute name, so the same seed attributes always
/// produce the same key regardless of how the seed was assembled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(BTreeMap<String, Vec<AttributeValue>>);

impl CacheKey {
    /// Derives a key from the entries of `seed` named in `names`.
    ///
    /// Returns `None` when none of the names are present, meaning the query
    /// cannot be cached.
    pub fn derive<'a, I>(seed: &AttributeMap, names: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let entries: BTreeMap<_, _> = seed.restrict_to(names).into_iter().collect();
        if entries.is_empty() {
            None
        } else {
            Some(Self(entries))
        }
    }

    /// Attribute names the key was built from.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
