use crate::source::AttributeSource;
use persondir_types::{AttributeMap, AttributeResult};
use std::collections::BTreeSet;

/// Returns the same attributes for every query.
#[derive(Debug, Clone)]
pub struct StubSource {
    name: String,
    attributes: AttributeMap,
}

impl StubSource {
    pub fn new(name: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }
}

impl AttributeSource for StubSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, _query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        Ok(Some(self.attributes.clone()))
    }

    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        Ok(Some(self.attributes.name_set()))
    }
}

/// Returns the query itself as the result.
#[derive(Debug, Clone)]
pub struct EchoSource {
    name: String,
}

impl EchoSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for EchoSource {
    fn default() -> Self {
        Self::new("echo")
    }
}

impl AttributeSource for EchoSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        Ok(Some(query.clone()))
    }
}
