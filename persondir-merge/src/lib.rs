//! Attribute merge policies for persondir.
//!
//! An [`AttributeMerger`] folds one source's result into the accumulated
//! result of the sources before it:
//!
//! - [`MultivaluedMerger`]: colliding attributes accumulate values, base first
//! - [`ReplacingMerger`]: colliding attributes take the addition's values
//! - [`NonCollidingMerger`]: colliding attributes keep the base's values
//!
//! Every merger borrows both inputs and returns a freshly allocated map. A
//! result held by a cache can therefore be composed further without the
//! cached copy changing underneath it.

mod merger;
mod multivalued;
mod non_colliding;
mod policy;
mod replacing;

pub use merger::AttributeMerger;
pub use multivalued::MultivaluedMerger;
pub use non_colliding::NonCollidingMerger;
pub use policy::MergePolicy;
pub use replacing::ReplacingMerger;
