//! Query attribute resolution for persondir sources.
//!
//! Sources backed by a data layer (tables, directories) do not take a seed
//! as is. They declare which seed attributes they can query on and how those
//! bind to data-layer attribute names. This crate turns a seed into the
//! argument list such a source executes, and shapes raw rows back into user
//! attributes:
//!
//! - [`QueryAttributeResolver`]: seed → [`QueryPlan`]
//! - [`WildcardTranslation`]: seed wildcard marker → data-layer pattern token
//! - [`CaseCanonicalization`]: case folding for values, columns and results
//! - [`ResultShaper`]: data-layer names → user attribute names
//!
//! A seed lacking the attributes a source needs is not an error: the
//! resolver reports [`QueryPlan::Insufficient`] and the source answers with
//! no match.

mod case;
mod mapping;
mod resolver;
mod result;
mod wildcard;

pub use case::{CaseCanonicalization, CaseRule};
pub use mapping::AttributeNameMapping;
pub use resolver::{BoundQuery, QueryArgument, QueryAttributeResolver, QueryPlan, QueryType};
pub use result::ResultShaper;
pub use wildcard::{WildcardTranslation, DEFAULT_WILDCARD};
