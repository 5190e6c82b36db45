//! Reads Scripture Burrito alignment JSON into an [`AlignmentGroup`].
//!
//! ```json
//! {
//!   "meta": {"creator": "GrapeCity", "conformsTo": "0.3"},
//!   "type": "translation",
//!   "records": [
//!     {"meta": {"id": "41004003.001", "origin": "manual"},
//!      "source": ["n41004003001"], "target": ["41004003001"]}
//!   ]
//! }
//! ```
//!
//! The reader checks shape only. Whether selectors resolve to real tokens
//! is decided later by the validation stage.

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ReaderConfig;
use crate::document::Document;
use crate::error::BurritoError;
use crate::group::AlignmentGroup;
use crate::metadata::{Metadata, DEFAULT_RECORD_STATUS};
use crate::record::AlignmentRecord;
use crate::reference::AlignmentReference;

const TARGET_ROLE: &str = "target";
const BCVW_LEN: usize = 11;
const BCVWP_LEN: usize = 12;

/// Reads and builds the group stored at `path`. `documents` are given in
/// role order.
pub fn read_alignment_group(
    path: impl AsRef<Path>,
    documents: Vec<Document>,
    cfg: &ReaderConfig,
) -> Result<AlignmentGroup, BurritoError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| BurritoError::Io {
        path: label.clone(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| BurritoError::Json {
        path: label.clone(),
        source,
    })?;
    build_alignment_group(value, &label, documents, cfg)
}

/// Builds a group from already-parsed JSON. `label` names the input in
/// errors and logs.
pub fn build_alignment_group(
    value: Value,
    label: &str,
    documents: Vec<Document>,
    cfg: &ReaderConfig,
) -> Result<AlignmentGroup, BurritoError> {
    let start = Instant::now();
    cfg.validate()?;
    let kind = cfg.expected_type;
    let roles = kind.roles();
    if documents.len() != roles.len() {
        return Err(BurritoError::InvalidConfig(format!(
            "{} documents given for {} roles",
            documents.len(),
            roles.len()
        )));
    }
    let json_err = |source| BurritoError::Json {
        path: label.to_string(),
        source,
    };

    let Value::Object(mut group) = value else {
        return Err(BurritoError::NotBurritoFormat { path: label.into() });
    };

    let found = group.get("type").and_then(Value::as_str).unwrap_or_default();
    if found != kind.tag() {
        return Err(BurritoError::TypeMismatch {
            expected: kind.tag().into(),
            found: found.into(),
        });
    }

    let meta = Metadata::from_map(take_object(&mut group, "meta")).map_err(json_err)?;
    let raw_records: Vec<Map<String, Value>> = match group.remove("records") {
        Some(records) => serde_json::from_value(records).map_err(json_err)?,
        None => Vec::new(),
    };
    if raw_records.is_empty() {
        return Err(BurritoError::EmptyGroup { path: label.into() });
    }

    let mut records = Vec::with_capacity(raw_records.len());
    for mut raw in raw_records {
        let mut meta = Metadata::from_map(take_object(&mut raw, "meta")).map_err(json_err)?;
        if meta.status.is_empty() {
            meta.status = DEFAULT_RECORD_STATUS.into();
        }

        let mut references = Vec::with_capacity(roles.len());
        for (role, document) in roles.iter().zip(&documents) {
            let mut selectors: Vec<String> = match raw.remove(*role) {
                Some(Value::Null) | None => Vec::new(),
                Some(value) => serde_json::from_value(value).map_err(json_err)?,
            };
            if *role == TARGET_ROLE && !cfg.keep_target_word_part {
                for selector in &mut selectors {
                    if selector.len() == BCVWP_LEN {
                        selector.truncate(BCVW_LEN);
                    }
                }
            }
            if selectors.is_empty() {
                debug!(record = %meta.id, role, "record_without_selectors");
            }
            references.push(((*role).to_string(), AlignmentReference::new(document.clone(), selectors)));
        }
        records.push(AlignmentRecord::new(meta, references, kind)?);
    }

    let group = AlignmentGroup::new(documents, meta, records, kind);
    info!(
        path = label,
        records = group.len(),
        canon = %group.canon(),
        elapsed_micros = start.elapsed().as_micros(),
        "alignments_loaded"
    );
    Ok(group)
}

fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::document::Scheme;

    fn documents() -> Vec<Document> {
        vec![Document::new("SBLGNT", Scheme::Bcvwp), Document::new("BSB", Scheme::Bcvwp)]
    }

    fn sample() -> Value {
        json!({
            "meta": {"creator": "GrapeCity", "conformsTo": "0.3"},
            "type": "translation",
            "records": [
                {"meta": {"id": "41004003.001", "process": "manual"},
                 "source": ["n41004003002", "n41004003001"], "target": ["410040030011"]},
                {"meta": {"id": "41004003.002", "origin": "automated", "status": "reviewed"},
                 "source": [], "target": ["41004003002"]}
            ]
        })
    }

    #[test]
    fn builds_records_with_normalized_metadata() {
        let group = build_alignment_group(sample(), "sample", documents(), &ReaderConfig::default()).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.meta().creator, "GrapeCity");

        let first = &group.records()[0];
        assert_eq!(first.meta().origin, "manual");
        assert_eq!(first.meta().status, "created");
        assert_eq!(first.source_selectors(), &["n41004003001", "n41004003002"]);
        assert_eq!(first.target_selectors(), &["410040030011"]);

        let second = &group.records()[1];
        assert_eq!(second.meta().status, "reviewed");
        assert!(second.source_selectors().is_empty());
    }

    #[test]
    fn trims_target_word_parts_when_asked() {
        let cfg = ReaderConfig {
            keep_target_word_part: false,
            ..Default::default()
        };
        let group = build_alignment_group(sample(), "sample", documents(), &cfg).unwrap();
        assert_eq!(group.records()[0].target_selectors(), &["41004003001"]);
        // sources are never trimmed
        assert_eq!(group.records()[0].source_selectors()[0], "n41004003001");
    }

    #[test]
    fn list_input_is_not_burrito() {
        let res = build_alignment_group(json!([{"source": []}]), "legacy", documents(), &ReaderConfig::default());
        assert!(matches!(res, Err(BurritoError::NotBurritoFormat { .. })));
    }

    #[test]
    fn type_must_match() {
        let mut value = sample();
        value["type"] = json!("anaphora");
        let res = build_alignment_group(value, "sample", documents(), &ReaderConfig::default());
        assert!(matches!(res, Err(BurritoError::TypeMismatch { found, .. }) if found == "anaphora"));
    }

    #[test]
    fn empty_records_are_an_error() {
        let value = json!({"meta": {}, "type": "translation", "records": []});
        let res = build_alignment_group(value, "empty", documents(), &ReaderConfig::default());
        assert!(matches!(res, Err(BurritoError::EmptyGroup { .. })));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SBLGNT-BSB-manual.json");
        fs::write(&path, sample().to_string()).unwrap();
        let group = read_alignment_group(&path, documents(), &ReaderConfig::default()).unwrap();
        assert_eq!(group.source_docid(), Some("SBLGNT"));

        fs::write(&path, "{ not json").unwrap();
        let res = read_alignment_group(&path, documents(), &ReaderConfig::default());
        assert!(matches!(res, Err(BurritoError::Json { .. })));
    }
}
