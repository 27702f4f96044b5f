use crate::{AttributeMerger, MultivaluedMerger, NonCollidingMerger, ReplacingMerger};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Named merge policy, as written in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Colliding attributes accumulate values ([`MultivaluedMerger`]).
    Multivalued,
    /// The later source wins collisions ([`ReplacingMerger`]).
    Replacing,
    /// The earlier source wins collisions ([`NonCollidingMerger`]).
    NonColliding,
}

impl MergePolicy {
    /// Returns the merger implementing this policy.
    pub fn merger(self) -> Arc<dyn AttributeMerger> {
        match self {
            Self::Multivalued => Arc::new(MultivaluedMerger),
            Self::Replacing => Arc::new(ReplacingMerger),
            Self::NonColliding => Arc::new(NonCollidingMerger),
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Multivalued => "multivalued",
            Self::Replacing => "replacing",
            Self::NonColliding => "non_colliding",
        };
        f.write_str(name)
    }
}
