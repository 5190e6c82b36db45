use serde::{Deserialize, Serialize};

/// Settings for partitioning records into clean and bad sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Audit mode: bad records are reported and also kept in the clean set.
    /// Clean and bad then overlap.
    pub retain_bad_records: bool,
}
