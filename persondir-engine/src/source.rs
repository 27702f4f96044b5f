//! The attribute source capability.

use persondir_types::{AttributeMap, AttributeResult};
use std::collections::BTreeSet;

/// Anything that can answer an attribute query.
///
/// Implementations return `Ok(None)` when nothing matches (including when
/// the query lacks the attributes the source needs), `Ok(Some(map))` with the
/// attributes of exactly the identity matched, and `Err` when the source
/// itself failed or is misconfigured.
///
/// Engines and decorators implement this trait too, so they nest freely.
pub trait AttributeSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Runs a query.
    fn resolve(&self, query: &AttributeMap) -> AttributeResult<Option<AttributeMap>>;

    /// Attribute names this source may return. `None` when unknown.
    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        Ok(None)
    }

    /// Query attribute names this source understands. `None` when any
    /// attribute may be used.
    fn available_query_attributes(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        Ok(None)
    }
}
