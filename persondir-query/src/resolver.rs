//! Seed → query argument resolution.

use crate::{AttributeNameMapping, CaseCanonicalization, CaseRule, WildcardTranslation};
use persondir_types::{AttributeMap, AttributeValue, DefaultAttribute};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How the data layer combines query arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Every argument must match.
    #[default]
    And,
    /// Any argument may match.
    Or,
}

/// One bound query argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgument {
    /// Seed attribute the values came from.
    pub attribute: String,
    /// Data-layer attribute the values bind to.
    pub data_attribute: String,
    /// Values after wildcard translation and case folding. Never empty.
    pub values: Vec<AttributeValue>,
    /// Whether any value held the wildcard marker.
    pub wildcard: bool,
    /// Whether the comparison ignores case.
    pub case_insensitive: bool,
    /// Folding the data layer applies to its own column before comparing.
    pub column_case: CaseCanonicalization,
}

/// A query ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub query_type: QueryType,
    pub arguments: Vec<QueryArgument>,
}

impl BoundQuery {
    /// Every argument value, flattened in argument order.
    pub fn positional_values(&self) -> Vec<&AttributeValue> {
        self.arguments.iter().flat_map(|a| a.values.iter()).collect()
    }
}

/// Outcome of resolving a seed for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    Ready(BoundQuery),
    /// The seed lacks the attributes this source queries on. The source
    /// answers with no match rather than an error.
    Insufficient,
}

impl QueryPlan {
    /// Returns the bound query, if any.
    pub fn into_query(self) -> Option<BoundQuery> {
        match self {
            Self::Ready(q) => Some(q),
            Self::Insufficient => None,
        }
    }
}

/// Builds the argument list a source executes for a given seed.
#[derive(Debug, Clone, Default)]
pub struct QueryAttributeResolver {
    default_attribute: DefaultAttribute,
    mapping: Option<AttributeNameMapping>,
    require_all_query_attributes: bool,
    use_all_query_attributes: bool,
    query_type: QueryType,
    wildcard: WildcardTranslation,
    case_rules: BTreeMap<String, CaseRule>,
}

impl QueryAttributeResolver {
    /// Creates a resolver that queries on the default attribute only.
    pub fn new(default_attribute: DefaultAttribute) -> Self {
        Self {
            default_attribute,
            ..Self::default()
        }
    }

    /// Sets the explicit seed → data-layer mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: AttributeNameMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// When set, a seed missing any mapped attribute is insufficient.
    #[must_use]
    pub fn require_all_query_attributes(mut self, require: bool) -> Self {
        self.require_all_query_attributes = require;
        self
    }

    /// Without an explicit mapping, query on every seed attribute instead of
    /// the default attribute alone.
    #[must_use]
    pub fn use_all_query_attributes(mut self, use_all: bool) -> Self {
        self.use_all_query_attributes = use_all;
        self
    }

    #[must_use]
    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    #[must_use]
    pub fn with_wildcard(mut self, wildcard: WildcardTranslation) -> Self {
        self.wildcard = wildcard;
        self
    }

    /// Marks a seed attribute as case-insensitive.
    #[must_use]
    pub fn case_insensitive(mut self, attribute: impl Into<String>, rule: CaseRule) -> Self {
        self.case_rules.insert(attribute.into(), rule);
        self
    }

    pub fn default_attribute(&self) -> &DefaultAttribute {
        &self.default_attribute
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn wildcard(&self) -> &WildcardTranslation {
        &self.wildcard
    }

    /// Seed attributes this resolver can query on. `None` when every seed
    /// attribute is usable.
    pub fn available_query_attributes(&self) -> Option<BTreeSet<String>> {
        match &self.mapping {
            Some(mapping) => Some(mapping.names().map(String::from).collect()),
            None if self.use_all_query_attributes => None,
            None => Some(BTreeSet::from([self.default_attribute.name().to_string()])),
        }
    }

    /// Resolves `seed` into the query to run.
    pub fn resolve(&self, seed: &AttributeMap) -> QueryPlan {
        let arguments = match &self.mapping {
            Some(mapping) => match self.bind_mapping(seed, mapping) {
                Some(arguments) => arguments,
                None => return QueryPlan::Insufficient,
            },
            None if self.use_all_query_attributes => seed
                .names()
                .filter_map(|name| self.bind(seed, name, name))
                .collect(),
            None => {
                let name = self.default_attribute.name();
                self.bind(seed, name, name).into_iter().collect()
            }
        };

        if arguments.is_empty() {
            return QueryPlan::Insufficient;
        }
        QueryPlan::Ready(BoundQuery {
            query_type: self.query_type,
            arguments,
        })
    }

    // Returns None when a required attribute is missing.
    fn bind_mapping(
        &self,
        seed: &AttributeMap,
        mapping: &AttributeNameMapping,
    ) -> Option<Vec<QueryArgument>> {
        let mut arguments = Vec::new();
        for (attribute, data_attributes) in mapping.resolved() {
            let mut bound = data_attributes
                .into_iter()
                .filter_map(|data_attribute| self.bind(seed, attribute, data_attribute))
                .peekable();
            if bound.peek().is_none() {
                if self.require_all_query_attributes {
                    return None;
                }
                continue;
            }
            arguments.extend(bound);
        }
        Some(arguments)
    }

    // Null entries carry no criteria; an attribute holding only nulls counts
    // as absent.
    fn bind(&self, seed: &AttributeMap, attribute: &str, data_attribute: &str) -> Option<QueryArgument> {
        let raw = seed.values(attribute)?;
        let rule = self.case_rules.get(attribute);

        let mut wildcard = false;
        let values: Vec<AttributeValue> = raw
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| {
                let (translated, had_marker) = self.wildcard.translate(v);
                wildcard |= had_marker;
                match rule {
                    Some(rule) => rule.value.apply_value(&translated),
                    None => translated,
                }
            })
            .collect();
        if values.is_empty() {
            return None;
        }

        Some(QueryArgument {
            attribute: attribute.to_string(),
            data_attribute: data_attribute.to_string(),
            values,
            wildcard,
            case_insensitive: rule.is_some(),
            column_case: rule.map(|r| r.column).unwrap_or_default(),
        })
    }
}
