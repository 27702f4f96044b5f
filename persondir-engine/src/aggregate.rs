//! Aggregation engine: queries an ordered list of sources and folds their
//! results with a merger.
//!
//! Sources are queried one at a time, in list order. In merging mode every
//! source sees the caller's seed; in cascading mode later sources see what
//! the earlier ones found. List order decides merge precedence either way.

use crate::source::AttributeSource;
use persondir_merge::{AttributeMerger, MergePolicy};
use persondir_types::{
    AttributeError, AttributeMap, AttributeResult, DefaultAttribute, Person, QuerySeed,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides which seed each source receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Every source is queried with the original seed.
    #[default]
    Merging,
    /// The first source is queried with the original seed, every later one
    /// with the result accumulated so far.
    Cascading,
}

impl AggregationMode {
    /// Merge policy used when none is configured.
    pub fn default_policy(self) -> MergePolicy {
        match self {
            Self::Merging => MergePolicy::Multivalued,
            Self::Cascading => MergePolicy::Replacing,
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merging => f.write_str("merging"),
            Self::Cascading => f.write_str("cascading"),
        }
    }
}

/// Queries an ordered list of sources and merges their results.
///
/// Configuration goes through `&mut self`, so it cannot race with queries
/// running on a shared engine.
pub struct AggregationEngine {
    name: String,
    mode: AggregationMode,
    sources: Vec<Arc<dyn AttributeSource>>,
    merger: Arc<dyn AttributeMerger>,
    default_attribute: DefaultAttribute,
    recover_exceptions: bool,
    stop_on_success: bool,
    stop_if_first_returns_none: bool,
}

impl AggregationEngine {
    /// Creates an engine with no sources and the mode's default merger.
    pub fn new(mode: AggregationMode) -> Self {
        Self {
            name: format!("{mode}-aggregator"),
            mode,
            sources: Vec::new(),
            merger: mode.default_policy().merger(),
            default_attribute: DefaultAttribute::default(),
            recover_exceptions: true,
            stop_on_success: false,
            stop_if_first_returns_none: false,
        }
    }

    /// Shorthand for a merging engine over `sources`.
    pub fn merging(sources: Vec<Arc<dyn AttributeSource>>) -> Self {
        Self::new(AggregationMode::Merging).with_sources(sources)
    }

    /// Shorthand for a cascading engine over `sources`.
    pub fn cascading(sources: Vec<Arc<dyn AttributeSource>>) -> Self {
        Self::new(AggregationMode::Cascading).with_sources(sources)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Arc<dyn AttributeSource>>) -> Self {
        self.set_sources(sources);
        self
    }

    #[must_use]
    pub fn with_merger(mut self, merger: Arc<dyn AttributeMerger>) -> Self {
        self.set_merger(merger);
        self
    }

    #[must_use]
    pub fn with_recover_exceptions(mut self, recover: bool) -> Self {
        self.set_recover_exceptions(recover);
        self
    }

    #[must_use]
    pub fn with_default_attribute(mut self, attribute: DefaultAttribute) -> Self {
        self.set_default_attribute(attribute);
        self
    }

    #[must_use]
    pub fn with_stop_on_success(mut self, stop: bool) -> Self {
        self.set_stop_on_success(stop);
        self
    }

    #[must_use]
    pub fn with_stop_if_first_returns_none(mut self, stop: bool) -> Self {
        self.stop_if_first_returns_none = stop;
        self
    }

    // ── Configuration ────────────────────────────────────────────

    pub fn set_sources(&mut self, sources: Vec<Arc<dyn AttributeSource>>) {
        self.sources = sources;
    }

    pub fn set_merger(&mut self, merger: Arc<dyn AttributeMerger>) {
        self.merger = merger;
    }

    /// When `true` (the default), failing sources are logged and skipped.
    pub fn set_recover_exceptions(&mut self, recover: bool) {
        self.recover_exceptions = recover;
    }

    pub fn set_default_attribute(&mut self, attribute: DefaultAttribute) {
        self.default_attribute = attribute;
    }

    /// When `true`, iteration stops at the first source that finds a match.
    pub fn set_stop_on_success(&mut self, stop: bool) {
        self.stop_on_success = stop;
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn sources(&self) -> &[Arc<dyn AttributeSource>] {
        &self.sources
    }

    pub fn merger(&self) -> &Arc<dyn AttributeMerger> {
        &self.merger
    }

    pub fn default_attribute(&self) -> &DefaultAttribute {
        &self.default_attribute
    }

    pub fn recover_exceptions(&self) -> bool {
        self.recover_exceptions
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Resolves a seed of either shape.
    pub fn resolve(&self, seed: QuerySeed) -> AttributeResult<Option<AttributeMap>> {
        match seed {
            QuerySeed::Identifier(id) => self.resolve_by_identifier(&id),
            QuerySeed::Query(query) => self.resolve_by_query(&query),
        }
    }

    /// Resolves attributes for an identifier on the default attribute.
    pub fn resolve_by_identifier(&self, id: &str) -> AttributeResult<Option<AttributeMap>> {
        if id.trim().is_empty() {
            return Err(AttributeError::InvalidArgument(
                "identifier must not be empty".to_string(),
            ));
        }
        self.resolve_by_query(&self.default_attribute.seed_for(id))
    }

    /// Resolves attributes for an explicit query.
    pub fn resolve_by_query(&self, seed: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        self.ensure_sources()?;

        let mut result: Option<AttributeMap> = None;
        let mut first_query = true;

        for source in &self.sources {
            let Some(query) = self.query_for(seed, result.as_ref(), first_query) else {
                debug!("{}: first source found nothing, skipping the rest", self.name);
                break;
            };

            let current = match source.resolve(query) {
                Ok(current) => {
                    first_query = false;
                    current
                }
                Err(e) => {
                    self.recover(source.as_ref(), e)?;
                    continue;
                }
            };

            let Some(current) = current else {
                debug!("{}: source {} found no match", self.name, source.name());
                continue;
            };
            debug!(
                "{}: source {} returned {} attributes",
                self.name,
                source.name(),
                current.len()
            );

            result = Some(match result {
                None => current,
                Some(accumulated) => self.merger.merge(&accumulated, &current),
            });

            if self.stop_on_success {
                break;
            }
        }

        Ok(result)
    }

    /// Resolves an identifier into a [`Person`].
    ///
    /// The identity is read from the default attribute of the result, falling
    /// back to `id` when the sources did not report it.
    pub fn resolve_person(&self, id: &str) -> AttributeResult<Option<Person>> {
        let attributes = self.resolve_by_identifier(id)?;
        Ok(attributes.map(|attributes| {
            let identity = self
                .default_attribute
                .identifier_in(&attributes)
                .unwrap_or(id)
                .to_string();
            Person::new(identity, attributes)
        }))
    }

    /// Union of every source's declared attribute names.
    ///
    /// This is a declaration only. A merger may drop or rename attributes, so
    /// the set is not guaranteed to equal what a real merge produces.
    pub fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        self.ensure_sources()?;

        let mut names: Option<BTreeSet<String>> = None;
        for source in &self.sources {
            let declared = match source.possible_attribute_names() {
                Ok(Some(declared)) => declared,
                Ok(None) => continue,
                Err(e) => {
                    self.recover(source.as_ref(), e)?;
                    continue;
                }
            };
            names = Some(match names {
                None => declared,
                Some(names) => self.merger.merge_possible_names(&names, &declared),
            });
        }
        Ok(names)
    }

    /// Union of every source's query attribute names.
    pub fn available_query_attributes(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        self.ensure_sources()?;

        let mut names: Option<BTreeSet<String>> = None;
        for source in &self.sources {
            match source.available_query_attributes() {
                Ok(Some(declared)) => names.get_or_insert_with(BTreeSet::new).extend(declared),
                Ok(None) => {}
                Err(e) => self.recover(source.as_ref(), e)?,
            }
        }
        Ok(names)
    }

    fn ensure_sources(&self) -> AttributeResult<()> {
        if self.sources.is_empty() {
            return Err(AttributeError::NotConfigured(format!(
                "{} has no attribute sources",
                self.name
            )));
        }
        Ok(())
    }

    // Returns None when the remaining sources must be skipped.
    fn query_for<'a>(
        &self,
        seed: &'a AttributeMap,
        result: Option<&'a AttributeMap>,
        first_query: bool,
    ) -> Option<&'a AttributeMap> {
        match self.mode {
            AggregationMode::Merging => Some(seed),
            AggregationMode::Cascading if first_query => Some(seed),
            AggregationMode::Cascading => match result {
                Some(accumulated) => Some(accumulated),
                None if self.stop_if_first_returns_none => None,
                None => Some(seed),
            },
        }
    }

    fn recover(&self, source: &dyn AttributeSource, error: AttributeError) -> AttributeResult<()> {
        if self.recover_exceptions && error.is_recoverable() {
            warn!(
                "{}: recovered from failure in source {}: {}",
                self.name,
                source.name(),
                error
            );
            Ok(())
        } else {
            Err(error)
        }
    }
}

impl fmt::Debug for AggregationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregationEngine")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("sources", &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>())
            .field("merger", &self.merger)
            .field("recover_exceptions", &self.recover_exceptions)
            .finish_non_exhaustive()
    }
}

impl AttributeSource for AggregationEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        self.resolve_by_query(query)
    }

    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        AggregationEngine::possible_attribute_names(self)
    }

    fn available_query_attributes(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        AggregationEngine::available_query_attributes(self)
    }
}
