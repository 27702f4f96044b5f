use persondir_types::AttributeValue;
use serde::{Deserialize, Serialize};

/// How text is folded before comparison or return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseCanonicalization {
    /// Leave text as is.
    #[default]
    None,
    Lower,
    Upper,
}

impl CaseCanonicalization {
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_string(),
            Self::Lower => text.to_lowercase(),
            Self::Upper => text.to_uppercase(),
        }
    }

    /// Folds a text value; other values pass through.
    #[must_use]
    pub fn apply_value(self, value: &AttributeValue) -> AttributeValue {
        match self {
            Self::None => value.clone(),
            mode => value.map_text(|s| mode.apply(s)),
        }
    }
}

/// Case handling for one case-insensitive query attribute.
///
/// The query value and the data-layer column are folded independently, so a
/// lookup can lower-case the value while the column is wrapped in an upper
/// function, or leave the column alone when the data layer already compares
/// case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRule {
    #[serde(default)]
    pub value: CaseCanonicalization,
    #[serde(default)]
    pub column: CaseCanonicalization,
}

impl CaseRule {
    /// Folds both the value and the column the same way.
    #[must_use]
    pub const fn both(mode: CaseCanonicalization) -> Self {
        Self {
            value: mode,
            column: mode,
        }
    }
}
