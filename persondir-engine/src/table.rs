//! In-memory table source.
//!
//! Behaves like a single-row data-layer source: the seed goes through a
//! [`QueryAttributeResolver`], the bound query is evaluated against the rows,
//! and the matching row is shaped into user attributes. Useful for fixtures
//! and small static directories.

use crate::source::AttributeSource;
use persondir_query::{
    BoundQuery, QueryArgument, QueryAttributeResolver, QueryPlan, QueryType, ResultShaper,
};
use persondir_types::{AttributeError, AttributeMap, AttributeResult, AttributeValue};
use std::collections::BTreeSet;
use tracing::debug;

pub struct TableSource {
    name: String,
    rows: Vec<AttributeMap>,
    resolver: QueryAttributeResolver,
    shaper: ResultShaper,
}

impl TableSource {
    pub fn new(name: impl Into<String>, resolver: QueryAttributeResolver) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            resolver,
            shaper: ResultShaper::new(),
        }
    }

    #[must_use]
    pub fn with_rows(mut self, rows: impl IntoIterator<Item = AttributeMap>) -> Self {
        self.rows.extend(rows);
        self
    }

    #[must_use]
    pub fn with_shaper(mut self, shaper: ResultShaper) -> Self {
        self.shaper = shaper;
        self
    }

    pub fn rows(&self) -> &[AttributeMap] {
        &self.rows
    }

    fn row_matches(&self, row: &AttributeMap, query: &BoundQuery) -> bool {
        let token = self.resolver.wildcard().token.as_str();
        let mut results = query
            .arguments
            .iter()
            .map(|argument| argument_matches(row, argument, token));
        match query.query_type {
            QueryType::And => results.all(|m| m),
            QueryType::Or => results.any(|m| m),
        }
    }
}

fn argument_matches(row: &AttributeMap, argument: &QueryArgument, token: &str) -> bool {
    let Some(cells) = row.values(&argument.data_attribute) else {
        return false;
    };
    cells.iter().any(|cell| {
        argument
            .values
            .iter()
            .any(|wanted| value_matches(cell, wanted, argument, token))
    })
}

fn value_matches(cell: &AttributeValue, wanted: &AttributeValue, argument: &QueryArgument, token: &str) -> bool {
    let (Some(cell), Some(wanted)) = (cell.as_text(), wanted.as_text()) else {
        return cell == wanted;
    };
    let mut cell = argument.column_case.apply(cell);
    let mut wanted = wanted.to_string();
    if argument.case_insensitive {
        cell = cell.to_lowercase();
        wanted = wanted.to_lowercase();
    }
    if argument.wildcard {
        like(&wanted, token, &cell)
    } else {
        cell == wanted
    }
}

/// `LIKE`-style matching where `token` stands for any run of characters.
/// An empty token matches nothing, so the pattern is compared literally.
fn like(pattern: &str, token: &str, text: &str) -> bool {
    if token.is_empty() {
        return pattern == text;
    }
    let parts: Vec<&str> = pattern.split(token).collect();
    let (first, rest) = match parts.split_first() {
        Some(split) => split,
        None => return text.is_empty(),
    };
    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return remaining.is_empty();
    };
    for part in middle {
        match remaining.find(part) {
            Some(at) => remaining = &remaining[at + part.len()..],
            None => return false,
        }
    }
    remaining.len() >= last.len() && remaining.ends_with(last)
}

impl AttributeSource for TableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, query: &AttributeMap) -> AttributeResult<Option<AttributeMap>> {
        let QueryPlan::Ready(bound) = self.resolver.resolve(query) else {
            debug!("{}: seed lacks query attributes", self.name);
            return Ok(None);
        };

        let mut matches = self.rows.iter().filter(|row| self.row_matches(row, &bound));
        let Some(row) = matches.next() else {
            return Ok(None);
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(AttributeError::source_failure(
                &self.name,
                format!("query matched {} rows, expected at most one", extra + 1),
            ));
        }
        Ok(Some(self.shaper.shape(row)))
    }

    fn possible_attribute_names(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        if let Some(names) = self.shaper.possible_attribute_names() {
            return Ok(Some(names));
        }
        let names = self
            .rows
            .iter()
            .flat_map(|row| self.shaper.shape(row).name_set())
            .collect();
        Ok(Some(names))
    }

    fn available_query_attributes(&self) -> AttributeResult<Option<BTreeSet<String>>> {
        Ok(self.resolver.available_query_attributes())
    }
}
