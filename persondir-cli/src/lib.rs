//! Commands and output types for the persondir command line.

use anyhow::{bail, Result};
use clap::Subcommand;
use persondir_engine::AttributeSource;
use persondir_types::{AttributeMap, AttributeValue, DefaultAttribute};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve attributes for an identifier on the default attribute
    Resolve { id: String },

    /// Resolve attributes for `name=value` criteria. Repeat a name to add values
    Query {
        #[arg(required = true)]
        criteria: Vec<String>,
    },

    /// List the attribute names the directory may return
    Names,

    /// List the attribute names the directory can query on
    QueryAttributes,
}

/// Result of a resolve or query command.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LookupResponse {
    pub query: AttributeMap,
    pub found: bool,
    pub attributes: Option<AttributeMap>,
}

/// Result of a names command. `None` means the directory cannot say.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NamesResponse {
    pub names: Option<BTreeSet<String>>,
}

/// Runs `command` against `directory` and returns its JSON output.
pub fn execute(
    directory: &dyn AttributeSource,
    default_attribute: &DefaultAttribute,
    command: &Command,
) -> Result<serde_json::Value> {
    let value = match command {
        Command::Resolve { id } => {
            let query = identifier_query(default_attribute, id)?;
            serde_json::to_value(lookup(directory, query)?)?
        }
        Command::Query { criteria } => {
            let query = parse_query(criteria)?;
            serde_json::to_value(lookup(directory, query)?)?
        }
        Command::Names => serde_json::to_value(NamesResponse {
            names: directory.possible_attribute_names()?,
        })?,
        Command::QueryAttributes => serde_json::to_value(NamesResponse {
            names: directory.available_query_attributes()?,
        })?,
    };
    Ok(value)
}

fn lookup(directory: &dyn AttributeSource, query: AttributeMap) -> Result<LookupResponse> {
    debug!("Resolving {} query attributes against {}", query.len(), directory.name());
    let attributes = directory.resolve(&query)?;
    Ok(LookupResponse {
        query,
        found: attributes.is_some(),
        attributes,
    })
}

/// Builds the one-entry query for `id`.
pub fn identifier_query(default_attribute: &DefaultAttribute, id: &str) -> Result<AttributeMap> {
    if id.trim().is_empty() {
        bail!("identifier must not be empty");
    }
    Ok(default_attribute.seed_for(id))
}

/// Parses `name=value` arguments into a query map.
pub fn parse_query(criteria: &[String]) -> Result<AttributeMap> {
    let mut query = AttributeMap::new();
    for criterion in criteria {
        let Some((name, value)) = criterion.split_once('=') else {
            bail!("expected name=value, got {:?}", criterion);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("attribute name missing in {:?}", criterion);
        }
        query.extend_values(name, [parse_value(value)]);
    }
    if query.is_empty() {
        bail!("at least one name=value criterion is required");
    }
    Ok(query)
}

/// Integers and booleans are typed, everything else is text.
pub fn parse_value(raw: &str) -> AttributeValue {
    if let Ok(number) = raw.parse::<i64>() {
        return AttributeValue::Integer(number);
    }
    match raw {
        "true" => AttributeValue::Boolean(true),
        "false" => AttributeValue::Boolean(false),
        _ => AttributeValue::Text(raw.to_string()),
    }
}
