use std::collections::BTreeMap;
use std::time::Instant;

use burrito::{AlignmentRecord, RecordMap};
use tokens::Keyed;
use tracing::{debug, info, warn};

use crate::config::ValidateConfig;
use crate::reason::{BadRecord, Finding, Reason};

/// Classifies `record` against both inventories. `None` means valid.
///
/// The checks run in a fixed order and the first failing one decides the
/// reason, so the result depends only on the record and the inventories.
pub fn classify<S, T>(record: &AlignmentRecord, sources: &impl Keyed<S>, targets: &impl Keyed<T>) -> Option<Finding> {
    let source_sel = record.source_selectors();
    let target_sel = record.target_selectors();

    if source_sel.is_empty() {
        return Some(Finding::new(Reason::NoSource));
    }
    if source_sel.iter().any(String::is_empty) {
        return Some(Finding::new(Reason::EmptySource));
    }
    if target_sel.is_empty() {
        return Some(Finding::new(Reason::NoTarget));
    }
    if target_sel.iter().any(String::is_empty) {
        return Some(Finding::new(Reason::EmptyTarget));
    }

    let missing_sources = missing(source_sel, sources);
    if !missing_sources.is_empty() {
        return Some(Finding::with_missing(Reason::MissingSource, missing_sources));
    }
    let missing_targets = missing(target_sel, targets);
    if !missing_targets.is_empty() {
        let reason = if missing_targets.len() == target_sel.len() {
            Reason::MissingTargetAll
        } else {
            Reason::MissingTargetSome
        };
        return Some(Finding::with_missing(reason, missing_targets));
    }
    None
}

fn missing<V>(selectors: &[String], inventory: &impl Keyed<V>) -> Vec<String> {
    selectors
        .iter()
        .filter(|sel| !inventory.contains_key(sel))
        .cloned()
        .collect()
}

/// Result of [`partition`].
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub clean: RecordMap<AlignmentRecord>,
    pub bad: RecordMap<BadRecord>,
    pub counts: BTreeMap<Reason, usize>,
}

impl Partition {
    pub fn bad_count(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Splits `records` into clean and bad sets keyed by record identifier.
///
/// In the default mode every record lands in exactly one set. With
/// `retain_bad_records` bad records also stay in `clean`. A repeated
/// identifier replaces the earlier record before classification, keeping
/// the position of its first occurrence.
pub fn partition<S, T>(
    records: impl IntoIterator<Item = AlignmentRecord>,
    sources: &impl Keyed<S>,
    targets: &impl Keyed<T>,
    cfg: &ValidateConfig,
) -> Partition {
    let start = Instant::now();
    let mut out = Partition::default();
    let mut total = 0usize;

    let mut unique: RecordMap<AlignmentRecord> = RecordMap::new();
    for record in records {
        total += 1;
        let id = record.identifier().to_string();
        if unique.insert(id.clone(), record).is_some() {
            warn!(record = %id, "duplicate_record_id");
        }
    }

    for record in unique.into_values() {
        let id = record.identifier().to_string();
        match classify(&record, sources, targets) {
            None => {
                out.clean.insert(id, record);
            }
            Some(finding) => {
                debug!(record = %id, reason = %finding.reason, missing = ?finding.missing, "bad_record");
                *out.counts.entry(finding.reason).or_default() += 1;
                if cfg.retain_bad_records {
                    out.clean.insert(id.clone(), record.clone());
                }
                out.bad.insert(id, BadRecord::new(record, finding));
            }
        }
    }

    for (reason, count) in &out.counts {
        if cfg.retain_bad_records {
            warn!(reason = %reason, count, message = reason.message(), "bad_records_retained");
        } else {
            warn!(reason = %reason, count, message = reason.message(), "bad_records_dropped");
        }
    }
    info!(
        total,
        clean = out.clean.len(),
        bad = out.bad.len(),
        retain_bad_records = cfg.retain_bad_records,
        elapsed_micros = start.elapsed().as_micros(),
        "partition_complete"
    );
    out
}

#[cfg(test)]
mod tests {
    use burrito::{AlignmentReference, Document, Metadata, Scheme};

    use super::*;

    fn inventory(ids: &[&str]) -> BTreeMap<String, ()> {
        ids.iter().map(|id| (id.to_string(), ())).collect()
    }

    fn record(id: &str, source: &[&str], target: &[&str]) -> AlignmentRecord {
        AlignmentRecord::translation(
            Metadata::with_id(id),
            AlignmentReference::new(Document::new("SBLGNT", Scheme::Bcvwp), source.iter().copied()),
            AlignmentReference::new(Document::new("BSB", Scheme::Bcvwp), target.iter().copied()),
        )
    }

    #[test]
    fn no_source_selectors() {
        let rec = record("a", &[], &["t1"]);
        let finding = classify(&rec, &inventory(&["s1"]), &inventory(&["t1"])).unwrap();
        assert_eq!(finding.reason, Reason::NoSource);
    }

    #[test]
    fn some_targets_missing() {
        let rec = record("b", &["s1"], &["t1", "t2"]);
        let finding = classify(&rec, &inventory(&["s1"]), &inventory(&["t1"])).unwrap();
        assert_eq!(finding, Finding::with_missing(Reason::MissingTargetSome, vec!["t2".into()]));
    }

    #[test]
    fn all_targets_missing() {
        let rec = record("c", &["s1"], &["t8", "t9"]);
        let finding = classify(&rec, &inventory(&["s1"]), &inventory(&["t1"])).unwrap();
        assert_eq!(finding.reason, Reason::MissingTargetAll);
        assert_eq!(finding.missing, vec!["t8", "t9"]);
    }

    #[test]
    fn valid_record_is_none() {
        let rec = record("d", &["s1", "s2"], &["t1"]);
        assert_eq!(classify(&rec, &inventory(&["s1", "s2"]), &inventory(&["t1"])), None);
    }

    #[test]
    fn decision_order_is_fixed() {
        let sources = inventory(&["s1"]);
        let targets = inventory(&["t1"]);
        // both sides broken: the source check wins
        let rec = record("e", &["", "s1"], &[]);
        assert_eq!(classify(&rec, &sources, &targets).unwrap().reason, Reason::EmptySource);
        let rec = record("f", &["s1"], &[]);
        assert_eq!(classify(&rec, &sources, &targets).unwrap().reason, Reason::NoTarget);
        let rec = record("g", &["s1"], &["", "t1"]);
        assert_eq!(classify(&rec, &sources, &targets).unwrap().reason, Reason::EmptyTarget);
        let rec = record("h", &["s9"], &["t9"]);
        let finding = classify(&rec, &sources, &targets).unwrap();
        assert_eq!(finding.reason, Reason::MissingSource);
        assert_eq!(finding.missing, vec!["s9"]);
    }

    #[test]
    fn classification_is_idempotent() {
        let sources = inventory(&["s1", "s2"]);
        let targets = inventory(&["t1"]);
        let records = [
            record("a", &[], &["t1"]),
            record("b", &["s1"], &["t1", "t2"]),
            record("c", &["s1", "s2"], &["t1"]),
            record("d", &["s3"], &["t1"]),
        ];
        for rec in &records {
            assert_eq!(classify(rec, &sources, &targets), classify(rec, &sources, &targets));
        }
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        let sources = inventory(&["s1", "s2"]);
        let targets = inventory(&["t1"]);
        let records = vec![
            record("a", &[], &["t1"]),
            record("b", &["s1"], &["t1", "t2"]),
            record("c", &["s1", "s2"], &["t1"]),
            record("d", &["s3"], &["t1"]),
            record("e", &["s2"], &["t1"]),
        ];
        let total = records.len();
        let part = partition(records, &sources, &targets, &ValidateConfig::default());

        assert_eq!(part.clean.len() + part.bad.len(), total);
        for id in ["a", "b", "c", "d", "e"] {
            assert!(part.clean.contains_key(id) ^ part.bad.contains_key(id), "{id} in exactly one set");
        }
        assert_eq!(part.clean.keys().collect::<Vec<_>>(), vec!["c", "e"]);
        assert_eq!(part.counts.get(&Reason::NoSource), Some(&1));
        assert_eq!(part.counts.get(&Reason::MissingTargetSome), Some(&1));
        assert_eq!(part.counts.get(&Reason::MissingSource), Some(&1));
        assert_eq!(part.bad_count(), 3);
        assert_eq!(part.bad.get("b").map(|b| b.data.clone()), Some(vec!["t2".to_string()]));
    }

    #[test]
    fn repeated_id_lands_in_one_set_decided_by_last_record() {
        let sources = inventory(&["s1"]);
        let targets = inventory(&["t1"]);
        let valid = || record("x", &["s1"], &["t1"]);
        let broken = || record("x", &["s1"], &["t9"]);

        let part = partition(
            vec![valid(), record("y", &["s1"], &["t1"]), broken()],
            &sources,
            &targets,
            &ValidateConfig::default(),
        );
        assert!(!part.clean.contains_key("x"));
        assert!(part.bad.contains_key("x"));
        assert_eq!(part.bad_count(), part.bad.len());
        assert_eq!(part.bad.get("x").map(|b| b.reason), Some(Reason::MissingTargetAll));

        let part = partition(
            vec![broken(), record("y", &["s1"], &["t1"]), valid()],
            &sources,
            &targets,
            &ValidateConfig::default(),
        );
        assert!(part.clean.contains_key("x"));
        assert!(!part.bad.contains_key("x"));
        assert_eq!(part.bad_count(), 0);
        assert_eq!(part.bad_count(), part.bad.len());
        // the replacement keeps the first position
        assert_eq!(part.clean.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn audit_mode_keeps_bad_records_in_clean() {
        let sources = inventory(&["s1"]);
        let targets = inventory(&["t1"]);
        let records = vec![record("a", &[], &["t1"]), record("b", &["s1"], &["t1"])];
        let cfg = ValidateConfig {
            retain_bad_records: true,
        };
        let part = partition(records, &sources, &targets, &cfg);
        assert_eq!(part.clean.len(), 2);
        assert_eq!(part.bad.len(), 1);
    }

    #[test]
    fn bad_record_display() {
        let rec = record("b", &["s1"], &["t1", "t2"]);
        let finding = classify(&rec, &inventory(&["s1"]), &inventory(&["t1"])).unwrap();
        let bad = BadRecord::new(rec, finding);
        assert_eq!(
            bad.display(),
            r#"b: MISSINGTARGETSOME. Sources: ["s1"], Missing targets: ["t2"]"#
        );
        assert_eq!(
            bad.to_string(),
            r#"<BadRecord (b): 'Some token references are missing from the target inventory', ["t2"]>"#
        );
    }
}
