use crate::{AttributeMap, AttributeValue};
use serde::{Deserialize, Serialize};

/// A resolved identity together with its attributes.
///
/// Two people are equal when both the identity and the full attribute
/// content match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub identity: String,
    pub attributes: AttributeMap,
}

impl Person {
    pub fn new(identity: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            identity: identity.into(),
            attributes,
        }
    }

    /// Returns the first value of an attribute.
    pub fn attribute_value(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.first_value(name)
    }

    /// Returns all values of an attribute.
    pub fn attribute_values(&self, name: &str) -> Option<&[AttributeValue]> {
        self.attributes.values(name)
    }
}
