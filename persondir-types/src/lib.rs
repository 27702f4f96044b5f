//! Core type definitions for persondir.
//!
//! This crate defines the data model every other persondir crate speaks:
//! - [`AttributeValue`] and [`AttributeMap`], the multi-valued attribute shape
//!   all sources normalize into
//! - [`Person`], an identity together with its attributes
//! - [`QuerySeed`] and [`DefaultAttribute`], how callers phrase a lookup
//! - [`CacheKey`], the deterministic key derived from a seed
//! - [`AttributeError`], the error taxonomy shared by sources and engines

mod error;
mod key;
mod map;
mod person;
mod seed;
mod value;

pub use error::{AttributeError, AttributeResult};
pub use key::CacheKey;
pub use map::AttributeMap;
pub use person::Person;
pub use seed::{DefaultAttribute, QuerySeed, DEFAULT_ATTRIBUTE_NAME};
pub use value::AttributeValue;
