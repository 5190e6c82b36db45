//! File layout conventions for one alignment set.
//!
//! ```text
//! <source_data_path>/<source_id>.tsv
//! <lang_data_path>/targets/<target_id>/<canon>_<target_id>.tsv
//! <lang_data_path>/alignments/<target_id>/<identifier>.json
//! <lang_data_path>/alignments/<target_id>/<identifier>.toml
//! ```
//!
//! The identifier is `<source_id>-<target_id>[-<alternate_id>]`, e.g.
//! `SBLGNT-BSB-manual`. Hyphens delimit the parts, so ids are restricted to
//! ASCII word characters.

use std::fmt;
use std::path::{Path, PathBuf};

use burrito::Canon;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AlignmentSetError {
    #[error("invalid {field}: '{value}' (ASCII letters, digits and underscores only)")]
    InvalidId { field: &'static str, value: String },
    #[error("missing {kind} file: {path}")]
    MissingFile { kind: &'static str, path: String },
}

/// Source, target and alignment files for one source/target pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentSet {
    pub source_id: String,
    pub target_id: String,
    /// ISO 639-3 code of the target language.
    pub target_language: String,
    #[serde(default = "default_source_data_path")]
    pub source_data_path: PathBuf,
    /// Language-specific data root, like `alignments-hin/data`.
    #[serde(default = "default_lang_data_path")]
    pub lang_data_path: PathBuf,
    #[serde(default = "default_alternate_id")]
    pub alternate_id: String,
}

impl AlignmentSet {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        target_language: impl Into<String>,
        source_data_path: impl Into<PathBuf>,
        lang_data_path: impl Into<PathBuf>,
    ) -> Result<Self, AlignmentSetError> {
        let set = Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            target_language: target_language.into(),
            source_data_path: source_data_path.into(),
            lang_data_path: lang_data_path.into(),
            alternate_id: default_alternate_id(),
        };
        set.validate()?;
        Ok(set)
    }

    /// Replaces the alternate id. An empty id drops the suffix from the
    /// identifier.
    pub fn with_alternate_id(mut self, alternate_id: impl Into<String>) -> Result<Self, AlignmentSetError> {
        self.alternate_id = alternate_id.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), AlignmentSetError> {
        check_id("source_id", &self.source_id)?;
        check_id("target_id", &self.target_id)?;
        if !self.alternate_id.is_empty() {
            check_id("alternate_id", &self.alternate_id)?;
        }
        Ok(())
    }

    pub fn identifier(&self) -> String {
        if self.alternate_id.is_empty() {
            format!("{}-{}", self.source_id, self.target_id)
        } else {
            format!("{}-{}-{}", self.source_id, self.target_id, self.alternate_id)
        }
    }

    pub fn canon(&self) -> Canon {
        Canon::for_source_id(&self.source_id)
    }

    pub fn source_path(&self) -> PathBuf {
        self.source_data_path.join(format!("{}.tsv", self.source_id))
    }

    pub fn target_path(&self) -> PathBuf {
        self.lang_data_path
            .join("targets")
            .join(&self.target_id)
            .join(format!("{}_{}.tsv", self.canon(), self.target_id))
    }

    pub fn alignment_path(&self) -> PathBuf {
        self.alignments_dir().join(format!("{}.json", self.identifier()))
    }

    pub fn toml_path(&self) -> PathBuf {
        self.alignments_dir().join(format!("{}.toml", self.identifier()))
    }

    fn alignments_dir(&self) -> PathBuf {
        self.lang_data_path.join("alignments").join(&self.target_id)
    }

    /// Reports the first of the four files that does not exist.
    pub fn check_files(&self) -> Result<(), AlignmentSetError> {
        let files = [
            ("source", self.source_path()),
            ("target", self.target_path()),
            ("alignment", self.alignment_path()),
            ("metadata", self.toml_path()),
        ];
        for (kind, path) in files {
            if !path.exists() {
                return Err(AlignmentSetError::MissingFile {
                    kind,
                    path: path.display().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Multi-line listing of the resolved paths.
    pub fn display_str(&self) -> String {
        format!(
            "- sourcepath: {}\n- targetpath: {}\n- alignmentpath: {}\n- tomlpath: {}\n",
            self.source_path().display(),
            self.target_path().display(),
            self.alignment_path().display(),
            self.toml_path().display()
        )
    }
}

impl fmt::Display for AlignmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<AlignmentSet: {}, {}>", self.target_language, self.identifier())
    }
}

fn check_id(field: &'static str, value: &str) -> Result<(), AlignmentSetError> {
    let valid = !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(AlignmentSetError::InvalidId {
            field,
            value: value.to_string(),
        })
    }
}

fn default_source_data_path() -> PathBuf {
    Path::new("data").join("sources")
}

fn default_lang_data_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_alternate_id() -> String {
    "manual".to_string()
}
