//! Shared test sources for engine tests.

#![allow(dead_code)]

use persondir_engine::AttributeSource;
use persondir_types::{AttributeError, AttributeMap, AttributeResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Looks up one seed attribute in a fixed table, recording every query.
pub struct KeyedSource {
    name: String,
    key_attribute: String,
    table: BTreeMap<String, AttributeMap>,
    calls: AtomicUsize,
    seen: Mutex<Vec<AttributeMap>>,
}

impl KeyedSource {
    pub fn new(name: &str, key_attribute: &str) -> Self {
        Self {
            name: name.to_string(),
            key_attribute: key_attribute.to_string(),
            table: BTreeMap::new(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_entry(mut self, key: &str, attributes: AttributeMap) -> Self {
        self.table.insert(key.to_string(), attributes);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<AttributeMap> {
        self.seen.lock().unwrap().clone()
    }
}

impl AttributeSource for KeyedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(query.clone());
        let Some(values) = query.values(&self.key_attribute) else {
            return Ok(None);
        };
        Ok(values
            .iter()
            .find_map(|v| self.table.get(&v.to_string()))
            .cloned())
    }

    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        Ok(Some(
            self.table.values().flat_map(AttributeMap::name_set).collect(),
        ))
    }

    fn available_query_attributes(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        Ok(Some(BTreeSet::from([self.key_attribute.clone()])))
    }
}

/// Fails every call with the given error.
pub struct FailingSource {
    name: String,
    error: AttributeError,
    calls: AtomicUsize,
}

impl FailingSource {
    pub fn recoverable(name: &str) -> Self {
        Self::with_error(name, AttributeError::source_failure(name, "connection refused"))
    }

    pub fn with_error(name: &str, error: AttributeError) -> Self {
        Self {
            name: name.to_string(),
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AttributeSource for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, _query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        Err(self.error.clone())
    }
}

/// Never matches anything and declares no names.
pub struct EmptySource;

impl AttributeSource for EmptySource {
    fn name(&self) -> &str {
        "empty"
    }

    fn resolve(&self, _query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        Ok(None)
    }
}

pub fn shared<S: AttributeSource + 'static>(source: S) -> Arc<dyn AttributeSource> {
    Arc::new(source)
}

pub fn text_map(pairs: &[(&str, &str)]) -> AttributeMap {
    pairs
        .iter()
        .fold(AttributeMap::new(), |map, (k, v)| map.with_value(*k, *v))
}
