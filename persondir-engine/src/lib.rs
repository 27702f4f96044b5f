//! Attribute aggregation engine for persondir.
//!
//! Resolves person attributes by querying an ordered list of
//! [`AttributeSource`]s and folding their results with a pluggable
//! [`persondir_merge::AttributeMerger`].
//!
//! # Architecture
//!
//! - **Source**: the capability every provider implements, engines included
//! - **Aggregation**: merging or cascading queries over a source list, with
//!   per-source failure recovery
//! - **Cache**: a decorator memoizing one source behind an injected store
//! - **Gateway**: a decorator that only consults its target when seed
//!   attributes match configured patterns
//! - **Config**: a TOML description of a whole directory
//!
//! # Example
//!
//! ```
//! use persondir_engine::{AggregationEngine, AttributeSource, StubSource};
//! use persondir_types::AttributeMap;
//! use std::sync::Arc;
//!
//! let names: Arc<dyn AttributeSource> = Arc::new(StubSource::new(
//!     "names",
//!     AttributeMap::new().with_value("givenName", "Eric"),
//! ));
//! let mail: Arc<dyn AttributeSource> = Arc::new(StubSource::new(
//!     "mail",
//!     AttributeMap::new().with_value("mail", "eric@example.edu"),
//! ));
//!
//! let engine = AggregationEngine::merging(vec![names, mail]);
//! let attributes = engine.resolve_by_identifier("edalquist").unwrap().unwrap();
//! assert_eq!(attributes.first_text("mail"), Some("eric@example.edu"));
//! ```

mod aggregate;
mod cache;
mod config;
mod error;
mod gateway;
mod source;
mod stub;
mod table;

pub use aggregate::{AggregationEngine, AggregationMode};
pub use cache::{CacheStore, CachedResult, CachingSource, LruCacheStore, MemoryCacheStore};
pub use config::{
    CacheConfig, DirectoryConfig, GatewayConfig, SourceConfig, SourceKind, TableConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use gateway::{PatternMatchMode, RegexGateway};
pub use source::AttributeSource;
pub use stub::{EchoSource, StubSource};
pub use table::TableSource;
