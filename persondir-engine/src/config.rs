//! Directory configuration. Describes an engine, its cache and its sources
//! in a TOML file.
//!
//! ```toml
//! default_attribute = "username"
//! mode = "cascading"
//!
//! [cache]
//! capacity = 1000
//! cache_null_results = true
//!
//! [[sources]]
//! kind = "table"
//! name = "accounts"
//! rows = [{ username = ["edalquist"], studentId = [123] }]
//!
//! [[sources]]
//! kind = "table"
//! name = "registrar"
//! query_attributes = { studentId = [] }
//! rows = [{ studentId = [123], major = ["CS"] }]
//!
//! [sources.gateway]
//! patterns = { username = "[a-z]+" }
//! ```

use crate::aggregate::{AggregationEngine, AggregationMode};
use crate::cache::{CacheStore, CachingSource, LruCacheStore, MemoryCacheStore};
use crate::error::{ConfigError, ConfigResult};
use crate::gateway::{PatternMatchMode, RegexGateway};
use crate::source::AttributeSource;
use crate::stub::{EchoSource, StubSource};
use crate::table::TableSource;
use persondir_merge::MergePolicy;
use persondir_query::{
    AttributeNameMapping, CaseCanonicalization, CaseRule, QueryAttributeResolver, QueryType,
    ResultShaper, WildcardTranslation,
};
use persondir_types::{AttributeMap, DefaultAttribute};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Top-level directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub default_attribute: DefaultAttribute,
    #[serde(default)]
    pub mode: AggregationMode,
    /// Falls back to the mode's default policy.
    #[serde(default)]
    pub merger: Option<MergePolicy>,
    #[serde(default = "default_true")]
    pub recover_exceptions: bool,
    #[serde(default)]
    pub stop_on_success: bool,
    #[serde(default)]
    pub stop_if_first_returns_none: bool,
    #[serde(default)]
    pub cache: Option<CacheConfig>,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

fn default_true() -> bool {
    true
}

/// Cache settings. Without `capacity` the store is unbounded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub capacity: Option<usize>,
    #[serde(default)]
    pub key_attributes: Option<BTreeSet<String>>,
    #[serde(default)]
    pub cache_null_results: bool,
}

/// One source entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: SourceKind,
    #[serde(default)]
    pub gateway: Option<GatewayConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceKind {
    Stub { attributes: AttributeMap },
    Echo,
    Table(TableConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub rows: Vec<AttributeMap>,
    #[serde(default)]
    pub query_attributes: Option<AttributeNameMapping>,
    #[serde(default)]
    pub require_all_query_attributes: bool,
    #[serde(default)]
    pub use_all_query_attributes: bool,
    #[serde(default)]
    pub query_type: QueryType,
    #[serde(default)]
    pub wildcard: Option<WildcardTranslation>,
    #[serde(default)]
    pub case_insensitive: BTreeMap<String, CaseRule>,
    #[serde(default)]
    pub result_attributes: Option<AttributeNameMapping>,
    #[serde(default)]
    pub result_case: BTreeMap<String, CaseCanonicalization>,
    #[serde(default)]
    pub identity_case: CaseCanonicalization,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub patterns: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub match_all_patterns: bool,
    #[serde(default)]
    pub value_mode: PatternMatchMode,
}

impl DirectoryConfig {
    /// Loads a configuration file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!(
            "Loaded directory configuration from {:?} ({} sources)",
            path,
            config.sources.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Builds the configured directory: the engine over every source, wrapped
    /// in a cache when one is configured.
    pub fn build(&self) -> ConfigResult<Arc<dyn AttributeSource>> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one source must be configured".to_string(),
            ));
        }

        let sources = self
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| self.build_source(index, source))
            .collect::<ConfigResult<Vec<_>>>()?;

        let merger = self.merger.unwrap_or_else(|| self.mode.default_policy());
        let engine = AggregationEngine::new(self.mode)
            .with_sources(sources)
            .with_merger(merger.merger())
            .with_default_attribute(self.default_attribute.clone())
            .with_recover_exceptions(self.recover_exceptions)
            .with_stop_on_success(self.stop_on_success)
            .with_stop_if_first_returns_none(self.stop_if_first_returns_none);
        info!(
            "Built {} directory over {} sources with {} merger",
            self.mode,
            engine.sources().len(),
            merger
        );

        let Some(cache) = &self.cache else {
            return Ok(Arc::new(engine));
        };
        let store: Arc<dyn CacheStore> = match cache.capacity {
            Some(capacity) => {
                let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
                    ConfigError::Invalid("cache capacity must be greater than zero".to_string())
                })?;
                Arc::new(LruCacheStore::new(capacity))
            }
            None => Arc::new(MemoryCacheStore::new()),
        };
        let mut caching = CachingSource::wrap(Arc::new(engine), store)
            .with_default_attribute(self.default_attribute.clone())
            .with_cache_null_results(cache.cache_null_results);
        caching.set_key_attributes(cache.key_attributes.clone());
        Ok(Arc::new(caching))
    }

    fn build_source(&self, index: usize, config: &SourceConfig) -> ConfigResult<Arc<dyn AttributeSource>> {
        let name = |kind: &str| {
            config
                .name
                .clone()
                .unwrap_or_else(|| format!("{kind}-{index}"))
        };

        let source: Arc<dyn AttributeSource> = match &config.kind {
            SourceKind::Stub { attributes } => {
                Arc::new(StubSource::new(name("stub"), attributes.clone()))
            }
            SourceKind::Echo => Arc::new(EchoSource::new(name("echo"))),
            SourceKind::Table(table) => Arc::new(self.build_table(name("table"), table)?),
        };

        let Some(gateway) = &config.gateway else {
            return Ok(source);
        };
        let gateway = RegexGateway::new(source, gateway.patterns.iter())?
            .match_all_patterns(gateway.match_all_patterns)
            .with_value_mode(gateway.value_mode);
        Ok(Arc::new(gateway))
    }

    fn build_table(&self, name: String, config: &TableConfig) -> ConfigResult<TableSource> {
        let mut resolver = QueryAttributeResolver::new(self.default_attribute.clone())
            .require_all_query_attributes(config.require_all_query_attributes)
            .use_all_query_attributes(config.use_all_query_attributes)
            .with_query_type(config.query_type);
        if let Some(mapping) = &config.query_attributes {
            resolver = resolver.with_mapping(mapping.clone());
        }
        if let Some(wildcard) = &config.wildcard {
            if wildcard.token.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "source {name}: wildcard token must not be empty"
                )));
            }
            resolver = resolver.with_wildcard(wildcard.clone());
        }
        for (attribute, rule) in &config.case_insensitive {
            resolver = resolver.case_insensitive(attribute.clone(), *rule);
        }

        let mut shaper = ResultShaper::new()
            .canonicalize_identity(self.default_attribute.name(), config.identity_case);
        if let Some(mapping) = &config.result_attributes {
            shaper = shaper.with_mapping(mapping.clone());
        }
        for (attribute, mode) in &config.result_case {
            shaper = shaper.case_insensitive(attribute.clone(), *mode);
        }

        Ok(TableSource::new(name, resolver)
            .with_rows(config.rows.iter().cloned())
            .with_shaper(shaper))
    }
}
