use serde::{Deserialize, Serialize};

use crate::alignment_type::AlignmentType;
use crate::document::Scheme;
use crate::error::BurritoError;

/// Settings for reading alignment JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Keep the sub-word part digit on 12-character target selectors. When
    /// false they are trimmed to 11 characters.
    pub keep_target_word_part: bool,
    /// Type tag every group must carry.
    pub expected_type: AlignmentType,
    /// Scheme requested for both documents; non-source documents are
    /// downgraded from `BCVWP` automatically.
    pub scheme: Scheme,
}

impl ReaderConfig {
    pub fn validate(&self) -> Result<(), BurritoError> {
        if self.expected_type.roles().is_empty() {
            return Err(BurritoError::InvalidConfig(format!(
                "type '{}' has no roles to read",
                self.expected_type
            )));
        }
        Ok(())
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            keep_target_word_part: true,
            expected_type: AlignmentType::Translation,
            scheme: Scheme::Bcvwp,
        }
    }
}
