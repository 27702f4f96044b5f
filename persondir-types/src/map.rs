//! The multi-valued attribute map.

use crate::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

/// Mapping from attribute name to an ordered list of values.
///
/// A missing key means the source does not know the attribute. A key with an
/// empty (or `Null`-only) list means it knows the attribute has no value.
///
/// Maps are built fresh per query and treated as values afterwards: mergers
/// borrow them and allocate a new map rather than editing either input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, Vec<AttributeValue>>);

impl AttributeMap {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder: sets `name` to a single value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.0.insert(name.into(), vec![value.into()]);
        self
    }

    /// Builder: sets `name` to the given values.
    #[must_use]
    pub fn with_values<V, I>(mut self, name: impl Into<String>, values: I) -> Self
    where
        V: Into<AttributeValue>,
        I: IntoIterator<Item = V>,
    {
        self.0
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `name` to `values`, returning the previous list if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<AttributeValue>,
    ) -> Option<Vec<AttributeValue>> {
        self.0.insert(name.into(), values)
    }

    /// Appends values to `name`, creating the entry if it is absent.
    pub fn extend_values(&mut self, name: &str, values: impl IntoIterator<Item = AttributeValue>) {
        match self.0.get_mut(name) {
            Some(existing) => existing.extend(values),
            None => {
                self.0.insert(name.to_string(), values.into_iter().collect());
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<AttributeValue>> {
        self.0.remove(name)
    }

    /// Returns all values for `name`.
    pub fn values(&self, name: &str) -> Option<&[AttributeValue]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Returns the first value for `name`.
    pub fn first_value(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name).and_then(|v| v.first())
    }

    /// Returns the first textual value for `name`, skipping non-text entries.
    pub fn first_text(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(|v| v.iter().find_map(AttributeValue::as_text))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Attribute names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Attribute names collected into a set.
    #[must_use]
    pub fn name_set(&self) -> BTreeSet<String> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<AttributeValue>> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new map holding only the entries whose name is in `names`.
    /// Names absent from this map are skipped.
    #[must_use]
    pub fn restrict_to<'a, I>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut restricted = BTreeMap::new();
        for name in names {
            if let Some(values) = self.0.get(name) {
                restricted.insert(name.to_string(), values.clone());
            }
        }
        Self(restricted)
    }
}

impl FromIterator<(String, Vec<AttributeValue>)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<AttributeValue>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Vec<AttributeValue>>> for AttributeMap {
    fn from(map: BTreeMap<String, Vec<AttributeValue>>) -> Self {
        Self(map)
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, Vec<AttributeValue>);
    type IntoIter = btree_map::IntoIter<String, Vec<AttributeValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a String, &'a Vec<AttributeValue>);
    type IntoIter = btree_map::Iter<'a, String, Vec<AttributeValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
