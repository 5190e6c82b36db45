use serde::{Deserialize, Serialize};

/// What to do with a selector that does not resolve to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorPolicy {
    /// Drop it silently.
    Drop,
    /// Drop it and log a warning.
    #[default]
    Warn,
    /// Abort aggregation.
    Fail,
}

/// Settings for verse aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    pub missing_selector: SelectorPolicy,
    /// Treat tokens outside the verse's own token lists as unresolved, so
    /// every aligned token is also listed in its verse.
    pub verse_scoped: bool,
    /// Sort inputs by verse before grouping.
    pub sort_input: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            missing_selector: SelectorPolicy::Warn,
            verse_scoped: true,
            sort_input: true,
        }
    }
}
