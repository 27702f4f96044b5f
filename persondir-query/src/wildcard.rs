use persondir_types::AttributeValue;
use serde::{Deserialize, Serialize};

/// Wildcard marker accepted in seed values.
pub const DEFAULT_WILDCARD: &str = "*";

/// Rewrites the seed wildcard marker into the data layer's pattern token.
///
/// The default turns `*` into the SQL `LIKE` token `%`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildcardTranslation {
    pub marker: String,
    pub token: String,
}

impl WildcardTranslation {
    pub fn new(marker: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            token: token.into(),
        }
    }

    /// Whether `text` holds the marker.
    #[must_use]
    pub fn matches_marker(&self, text: &str) -> bool {
        !self.marker.is_empty() && text.contains(&self.marker)
    }

    /// Translates one value, returning it together with whether a marker was
    /// replaced. Non-text values are never wildcards.
    #[must_use]
    pub fn translate(&self, value: &AttributeValue) -> (AttributeValue, bool) {
        match value.as_text() {
            Some(text) if self.matches_marker(text) => (
                AttributeValue::Text(text.replace(&self.marker, &self.token)),
                true,
            ),
            _ => (value.clone(), false),
        }
    }
}

impl Default for WildcardTranslation {
    fn default() -> Self {
        Self::new(DEFAULT_WILDCARD, "%")
    }
}
