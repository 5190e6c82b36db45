//! YAML configuration for an alignment run.
//!
//! One file names the alignment set to load and carries the settings of
//! every stage. All stage sections are optional.
//!
//! ```yaml
//! version: "1.0"
//! name: "BSB review"
//!
//! alignment_set:
//!   source_id: SBLGNT
//!   target_id: BSB
//!   target_language: eng
//!   source_data_path: data/sources
//!   lang_data_path: ../alignments-eng/data
//!
//! inventory:
//!   id_header: id
//!
//! reader:
//!   keep_target_word_part: true
//!   expected_type: translation
//!   scheme: BCVWP
//!
//! validate:
//!   retain_bad_records: false
//!
//! aggregate:
//!   missing_selector: warn
//!   verse_scoped: true
//!   sort_input: true
//! ```

use std::fs;
use std::path::Path;

use burrito::ReaderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokens::InventoryConfig;
use validate::ValidateConfig;
use verse::AggregateConfig;

use crate::alignment_set::AlignmentSet;
use crate::manager::ManagerConfig;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AlignmentsConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Files to load. Library callers that assemble inventories themselves
    /// can leave it out.
    #[serde(default)]
    pub alignment_set: Option<AlignmentSet>,

    #[serde(default)]
    pub inventory: InventoryConfig,

    #[serde(default)]
    pub reader: ReaderConfig,

    #[serde(default)]
    pub validate: ValidateConfig,

    #[serde(default)]
    pub aggregate: AggregateConfig,
}

impl AlignmentsConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AlignmentsConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        if let Some(set) = &self.alignment_set {
            set.validate()
                .map_err(|err| ConfigLoadError::Validation(format!("alignment_set: {err}")))?;
        }
        self.inventory
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("inventory: {err}")))?;
        self.reader
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("reader: {err}")))?;
        Ok(())
    }

    /// The alignment set, or `MissingField` when the file has none.
    pub fn require_alignment_set(&self) -> Result<&AlignmentSet, ConfigLoadError> {
        self.alignment_set
            .as_ref()
            .ok_or_else(|| ConfigLoadError::MissingField("alignment_set".to_string()))
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            inventory: self.inventory.clone(),
            reader: self.reader.clone(),
            validate: self.validate.clone(),
            aggregate: self.aggregate.clone(),
        }
    }
}

impl Default for AlignmentsConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            alignment_set: None,
            inventory: InventoryConfig::default(),
            reader: ReaderConfig::default(),
            validate: ValidateConfig::default(),
            aggregate: AggregateConfig::default(),
        }
    }
}
