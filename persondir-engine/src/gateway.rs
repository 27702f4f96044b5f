//! Conditional pass-through on seed attribute patterns.

use crate::source::AttributeSource;
use persondir_types::{AttributeError, AttributeMap, AttributeResult, AttributeValue};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// How the values of one multi-valued attribute are tested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternMatchMode {
    /// Every value must match.
    All,
    /// One matching value is enough.
    #[default]
    Any,
}

/// Only queries its target when seed attributes match configured patterns.
///
/// Patterns must match a whole value. The target receives the unchanged seed
/// and its result is returned as is; a seed failing the patterns yields no
/// match without touching the target.
pub struct RegexGateway {
    name: String,
    target: Arc<dyn AttributeSource>,
    patterns: Vec<(String, Regex)>,
    match_all_patterns: bool,
    value_mode: PatternMatchMode,
}

impl RegexGateway {
    /// Creates a gateway requiring every pattern to match.
    pub fn new<I, K, P>(target: Arc<dyn AttributeSource>, patterns: I) -> AttributeResult<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|(attribute, pattern)| {
                let attribute = attribute.into();
                let anchored = format!("^(?:{})$", pattern.as_ref());
                Regex::new(&anchored)
                    .map(|re| (attribute.clone(), re))
                    .map_err(|e| AttributeError::InvalidPattern {
                        attribute,
                        message: e.to_string(),
                    })
            })
            .collect::<AttributeResult<Vec<_>>>()?;

        if patterns.is_empty() {
            return Err(AttributeError::NotConfigured(format!(
                "gateway for {} has no patterns",
                target.name()
            )));
        }

        Ok(Self {
            name: format!("gateway({})", target.name()),
            target,
            patterns,
            match_all_patterns: true,
            value_mode: PatternMatchMode::default(),
        })
    }

    /// When `false`, one matching pattern is enough.
    #[must_use]
    pub fn match_all_patterns(mut self, all: bool) -> Self {
        self.match_all_patterns = all;
        self
    }

    #[must_use]
    pub fn with_value_mode(mut self, mode: PatternMatchMode) -> Self {
        self.value_mode = mode;
        self
    }

    /// Tests `seed` against the patterns.
    pub fn matches(&self, seed: &AttributeMap) -> AttributeResult<bool> {
        for (attribute, pattern) in &self.patterns {
            let matched = match seed.values(attribute) {
                Some(values) => self.values_match(attribute, pattern, values)?,
                None => false,
            };
            if self.match_all_patterns && !matched {
                return Ok(false);
            }
            if !self.match_all_patterns && matched {
                return Ok(true);
            }
        }
        Ok(self.match_all_patterns)
    }

    // Every value is type-checked before any is matched, so a bad seed fails
    // regardless of value order. Nulls never match.
    fn values_match(
        &self,
        attribute: &str,
        pattern: &Regex,
        values: &[AttributeValue],
    ) -> AttributeResult<bool> {
        let mut texts = Vec::with_capacity(values.len());
        for value in values {
            match value {
                AttributeValue::Text(text) => texts.push(Some(text.as_str())),
                AttributeValue::Null => texts.push(None),
                _ => {
                    return Err(AttributeError::NonTextValue {
                        attribute: attribute.to_string(),
                    });
                }
            }
        }

        let is_match = |text: &Option<&str>| text.is_some_and(|t| pattern.is_match(t));
        Ok(match self.value_mode {
            PatternMatchMode::All => !texts.is_empty() && texts.iter().all(is_match),
            PatternMatchMode::Any => texts.iter().any(is_match),
        })
    }
}

impl AttributeSource for RegexGateway {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        if !self.matches(query)? {
            debug!("{}: seed does not match, skipping target", self.name);
            return Ok(None);
        }
        self.target.resolve(query)
    }

    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        self.target.possible_attribute_names()
    }

    fn available_query_attributes(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        self.target.available_query_attributes()
    }
}
