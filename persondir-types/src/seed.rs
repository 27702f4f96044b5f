//! How callers phrase a lookup.

use crate::{AttributeMap, AttributeValue};
use serde::{Deserialize, Serialize};

/// Attribute name used when a lookup is phrased as a bare identifier.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "username";

/// The configured default attribute.
///
/// Expands a bare identifier into a one-entry query and reads the identifier
/// back out of a query map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultAttribute(String);

impl DefaultAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Builds the one-entry query for `identifier`.
    #[must_use]
    pub fn seed_for(&self, identifier: &str) -> AttributeMap {
        AttributeMap::new().with_value(self.0.clone(), identifier)
    }

    /// Reads the identifier (first textual value of the default attribute).
    pub fn identifier_in<'a>(&self, query: &'a AttributeMap) -> Option<&'a str> {
        query.first_text(&self.0)
    }
}

impl Default for DefaultAttribute {
    fn default() -> Self {
        Self(DEFAULT_ATTRIBUTE_NAME.to_string())
    }
}

/// The input to a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySeed {
    /// Shorthand for a one-entry query on the default attribute.
    Identifier(String),
    /// An explicit multi-valued query.
    Query(AttributeMap),
}

impl QuerySeed {
    /// Expands the seed into query criteria.
    #[must_use]
    pub fn into_query(self, default_attribute: &DefaultAttribute) -> AttributeMap {
        match self {
            Self::Identifier(id) => {
                AttributeMap::new().with_values(default_attribute.name(), [AttributeValue::Text(id)])
            }
            Self::Query(map) => map,
        }
    }
}

impl From<&str> for QuerySeed {
    fn from(id: &str) -> Self {
        Self::Identifier(id.to_string())
    }
}

impl From<String> for QuerySeed {
    fn from(id: String) -> Self {
        Self::Identifier(id)
    }
}

impl From<AttributeMap> for QuerySeed {
    fn from(map: AttributeMap) -> Self {
        Self::Query(map)
    }
}
