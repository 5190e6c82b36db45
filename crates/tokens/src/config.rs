use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Settings for loading a token inventory from TSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Column holding the token identifier.
    pub id_header: String,
}

impl InventoryConfig {
    pub fn new(id_header: impl Into<String>) -> Self {
        Self {
            id_header: id_header.into(),
        }
    }

    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.id_header.trim().is_empty() || self.id_header.contains('\t') {
            return Err(InventoryError::MissingIdColumn {
                label: "config".into(),
                header: self.id_header.clone(),
            });
        }
        Ok(())
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            id_header: "id".into(),
        }
    }
}
