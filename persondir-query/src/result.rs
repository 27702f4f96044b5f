use crate::{AttributeNameMapping, CaseCanonicalization};
use persondir_types::AttributeMap;
use std::collections::{BTreeMap, BTreeSet};

/// Turns a raw data-layer row into user attributes.
///
/// With a result mapping configured only mapped attributes survive, each
/// copied to every user name it maps to. Without one the row passes through
/// under its own names. Case folding runs afterwards, per result attribute,
/// and separately for the identity attribute.
#[derive(Debug, Clone, Default)]
pub struct ResultShaper {
    mapping: Option<AttributeNameMapping>,
    case_rules: BTreeMap<String, CaseCanonicalization>,
    identity: Option<(String, CaseCanonicalization)>,
}

impl ResultShaper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data-layer → user name mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: AttributeNameMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Folds the values of a user attribute.
    #[must_use]
    pub fn case_insensitive(mut self, attribute: impl Into<String>, mode: CaseCanonicalization) -> Self {
        self.case_rules.insert(attribute.into(), mode);
        self
    }

    /// Folds the identity attribute after any per-attribute rule has run.
    #[must_use]
    pub fn canonicalize_identity(mut self, attribute: impl Into<String>, mode: CaseCanonicalization) -> Self {
        self.identity = Some((attribute.into(), mode));
        self
    }

    /// User attribute names this shaper can produce. `None` when rows pass
    /// through unmapped.
    pub fn possible_attribute_names(&self) -> Option<BTreeSet<String>> {
        self.mapping
            .as_ref()
            .map(|m| m.target_names().map(String::from).collect())
    }

    pub fn shape(&self, raw: &AttributeMap) -> AttributeMap {
        let mut shaped = match &self.mapping {
            None => raw.clone(),
            Some(mapping) => {
                let mut mapped = AttributeMap::new();
                for (data_attribute, user_attributes) in mapping.resolved() {
                    let Some(values) = raw.values(data_attribute) else {
                        continue;
                    };
                    for user_attribute in user_attributes {
                        mapped.extend_values(user_attribute, values.iter().cloned());
                    }
                }
                mapped
            }
        };

        for (attribute, mode) in &self.case_rules {
            fold(&mut shaped, attribute, *mode);
        }
        if let Some((attribute, mode)) = &self.identity {
            fold(&mut shaped, attribute, *mode);
        }
        shaped
    }
}

fn fold(map: &mut AttributeMap, attribute: &str, mode: CaseCanonicalization) {
    if mode == CaseCanonicalization::None {
        return;
    }
    if let Some(values) = map.values(attribute) {
        let folded = values.iter().map(|v| mode.apply_value(v)).collect();
        map.insert(attribute, folded);
    }
}
