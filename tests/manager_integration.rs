mod common;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bible_alignments::{
    set_pipeline_metrics, AlignmentsConfig, CaseSensitivity, IntegrityWarning, Keyed, Manager, ManagerConfig,
    PipelineError, PipelineMetrics, PipelineStage, Reason, Side, Token,
};

#[test]
fn loads_alignment_set_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    assert!(set.check_files().is_ok());

    let mgr = Manager::from_alignment_set(&set, &ManagerConfig::default()).unwrap();
    assert_eq!(mgr.sources().len(), 7);
    assert_eq!(mgr.targets().len(), 9);
    assert_eq!(mgr.clean_records().len(), 2);
    assert_eq!(mgr.bad_records().len(), 1);
    assert_eq!(mgr.alignment_set(), Some(&set));
    assert_eq!(mgr.alignment_group().source_docid(), Some("SBLGNT"));
    assert_eq!(mgr.alignment_group().len(), 2);
}

#[test]
fn verse_with_one_bad_record() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let mgr = Manager::from_alignment_set(&set, &ManagerConfig::default()).unwrap();

    let bad = mgr.bad_records().get("41004003.003").unwrap();
    assert_eq!(bad.reason, Reason::MissingTargetSome);
    assert_eq!(bad.data, vec!["41004003099".to_string()]);
    assert_eq!(bad.record.meta().origin, "manual");

    let data = mgr.get("41004003").unwrap();
    assert_eq!(data.alignments().len(), 2);
    assert_eq!(data.sources().len(), 6);
    assert_eq!(data.targets().len(), 8);
    assert_eq!(data.get_texts(Side::Sources, false)[0], data.sources()[0].text());

    let pair = &data.alignments()[1];
    assert_eq!(pair.record_id, "41004003.002");
    let ids: Vec<&str> = pair.sources.iter().map(Token::id).collect();
    assert_eq!(ids, vec!["n41004003004", "n41004003005"]);
}

#[test]
fn verse_keys_come_from_sources() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let mgr = Manager::from_alignment_set(&set, &ManagerConfig::default()).unwrap();

    let source_verses = mgr.sources().verse_refs();
    for data in mgr.verses() {
        assert!(source_verses.contains(data.verse()));
    }
    assert!(!mgr.contains_verse("41004004"));
    assert!(matches!(mgr.get("41004004"), Err(PipelineError::VerseNotFound(_))));
    assert_eq!(mgr.keys().collect::<Vec<_>>(), vec!["41004003"]);
}

#[test]
fn aligned_tokens_belong_to_their_verse() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let mgr = Manager::from_alignment_set(&set, &ManagerConfig::default()).unwrap();

    for data in mgr.verses() {
        let sources: HashSet<&str> = data.sources().iter().map(Token::id).collect();
        let targets: HashSet<&str> = data.targets().iter().map(Token::id).collect();
        for pair in data.alignments() {
            assert!(pair.sources.iter().all(|t| sources.contains(t.id())));
            assert!(pair.targets.iter().all(|t| targets.contains(t.id())));
        }
    }
}

#[test]
fn token_alignments_match_lemma() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let mgr = Manager::from_alignment_set(&set, &ManagerConfig::default()).unwrap();

    let sowing = mgr.sources().get("n41004003005").unwrap().lemma().to_string();
    let found = mgr
        .token_alignments(&sowing, "source", "lemma", CaseSensitivity::Sensitive)
        .unwrap();
    let ids: Vec<&str> = found.iter().map(|r| r.identifier()).collect();
    assert_eq!(ids, vec!["41004003.002"]);

    // the bad record is not searched
    let went = mgr
        .token_alignments("went", "target", "text", CaseSensitivity::Sensitive)
        .unwrap();
    assert!(went.is_empty());

    let err = mgr
        .token_alignments("x", "source", "color", CaseSensitivity::Sensitive)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Inventory(_)));
}

#[test]
fn integrity_reports_uncovered_verse() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let mgr = Manager::from_alignment_set(&set, &ManagerConfig::default()).unwrap();

    let warnings = mgr.check_integrity();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        IntegrityWarning::UnalignedSourceVerses { count: 1, .. }
    ));
}

#[test]
fn audit_mode_keeps_bad_records() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let yaml = "version: \"1.0\"\nvalidate:\n  retain_bad_records: true\n";
    let cfg = AlignmentsConfig::from_yaml(yaml).unwrap().manager_config();
    let mgr = Manager::from_alignment_set(&set, &cfg).unwrap();

    assert_eq!(mgr.clean_records().len(), 3);
    assert_eq!(mgr.bad_records().len(), 1);
    // the missing target is dropped, the resolvable one still pairs
    assert_eq!(mgr.get("41004003").unwrap().alignments().len(), 3);
    assert_eq!(mgr.aggregation_stats().dropped_selectors, 1);
}

#[test]
fn describe_record_lists_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let mgr = Manager::from_alignment_set(&set, &ManagerConfig::default()).unwrap();

    let record = mgr.clean_records().get("41004003.001").unwrap();
    let text = mgr.describe_record(record);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "41004003.001 ------------");
    assert!(lines[1].starts_with("Source: n41004003001: "));
    assert!(lines[2].starts_with("Target: 41004003001: Listen"));
}

#[derive(Default)]
struct RecordingMetrics {
    stages: Mutex<Vec<(PipelineStage, bool)>>,
}

impl PipelineMetrics for RecordingMetrics {
    fn record_stage(&self, stage: PipelineStage, _latency: Duration, ok: bool) {
        self.stages.lock().unwrap().push((stage, ok));
    }
}

#[test]
fn stages_are_reported_to_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let set = common::write_alignment_set(dir.path());
    let metrics = Arc::new(RecordingMetrics::default());
    set_pipeline_metrics(Some(metrics.clone()));
    let built = Manager::from_alignment_set(&set, &ManagerConfig::default());
    set_pipeline_metrics(None);
    assert!(built.is_ok());

    let stages = metrics.stages.lock().unwrap();
    for stage in [
        PipelineStage::Inventories,
        PipelineStage::Alignments,
        PipelineStage::Validation,
        PipelineStage::Aggregation,
    ] {
        assert!(stages.contains(&(stage, true)), "missing {}", stage.as_str());
    }
}
