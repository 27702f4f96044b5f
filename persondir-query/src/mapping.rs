use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered mapping from one attribute name to one or more names on the other
/// side of a data layer.
///
/// Used both for query attributes (seed name → data-layer names) and for
/// result attributes (data-layer name → user names). An entry with no target
/// names maps the attribute to itself.
///
/// Serialized as a table of name → names. Entries keep the order they were
/// declared in, which is the order query arguments are bound in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeNameMapping {
    entries: Vec<(String, Vec<String>)>,
}

impl AttributeNameMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: appends an entry, or extends the targets of an existing one.
    #[must_use]
    pub fn bind<I, S>(mut self, name: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let targets: Vec<String> = targets.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(targets),
            None => self.entries.push((name, targets)),
        }
        self
    }

    /// Builder: maps `name` to itself.
    #[must_use]
    pub fn identity(self, name: impl Into<String>) -> Self {
        self.bind(name, std::iter::empty::<String>())
    }

    /// Source names in declared order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Entries as (source name, resolved target names), with self-mapping
    /// applied to entries that list no targets.
    pub fn resolved(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.entries.iter().map(|(name, targets)| {
            let resolved = if targets.is_empty() {
                vec![name.as_str()]
            } else {
                targets.iter().map(String::as_str).collect()
            };
            (name.as_str(), resolved)
        })
    }

    /// Every target name, self-mapping applied.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.resolved().flat_map(|(_, targets)| targets)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AttributeNameMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, targets) in &self.entries {
            map.serialize_entry(name, targets)?;
        }
        map.end()
    }
}

struct MappingVisitor;

impl<'de> Visitor<'de> for MappingVisitor {
    type Value = AttributeNameMapping;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of attribute name to a list of names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut mapping = AttributeNameMapping::new();
        while let Some((name, targets)) = access.next_entry::<String, Vec<String>>()? {
            mapping = mapping.bind(name, targets);
        }
        Ok(mapping)
    }
}

impl<'de> Deserialize<'de> for AttributeNameMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MappingVisitor)
    }
}
