use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use burrito::AlignmentRecord;
use serde::Serialize;
use tokens::{Keyed, Source, Target, Token, TokenInventory, VerseRef};
use tracing::{debug, info, warn};

use crate::config::{AggregateConfig, SelectorPolicy};
use crate::error::AggregateError;
use crate::group::group_by_verse;
use crate::verse_data::{AlignmentPair, VerseData};

/// Counters collected while aggregating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    pub verses: usize,
    pub pairs: usize,
    /// Selectors that did not resolve and were dropped.
    pub dropped_selectors: usize,
    /// Records without a parseable source verse.
    pub skipped_records: usize,
    /// Record verses with no tokens in the source inventory.
    pub orphan_verses: usize,
}

/// Verse-indexed output of [`aggregate`].
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub verses: BTreeMap<VerseRef, VerseData>,
    pub stats: AggregationStats,
}

/// Builds the [`VerseData`] for `verse`.
///
/// Every selector of every record is resolved through the inventories.
/// Unresolved selectors follow `cfg.missing_selector`; with
/// `cfg.verse_scoped`, a token outside `verse_sources`/`verse_targets`
/// counts as unresolved. A record whose source or target side ends up
/// empty contributes no pair. Returns the verse data and the number of
/// dropped selectors.
pub fn make_verse_data(
    verse: &VerseRef,
    records: &[&AlignmentRecord],
    sources: &impl Keyed<Source>,
    targets: &impl Keyed<Target>,
    verse_sources: Vec<Source>,
    verse_targets: Vec<Target>,
    cfg: &AggregateConfig,
) -> Result<(VerseData, usize), AggregateError> {
    let source_scope: HashSet<&str> = verse_sources.iter().map(Token::id).collect();
    let target_scope: HashSet<&str> = verse_targets.iter().map(Token::id).collect();
    let mut dropped = 0usize;
    let mut alignments = Vec::with_capacity(records.len());

    for record in records {
        let resolved_sources = resolve(
            verse,
            record,
            record.source_selectors(),
            sources,
            &source_scope,
            "source",
            cfg,
            &mut dropped,
        )?;
        let resolved_targets = resolve(
            verse,
            record,
            record.target_selectors(),
            targets,
            &target_scope,
            "target",
            cfg,
            &mut dropped,
        )?;
        if resolved_sources.is_empty() || resolved_targets.is_empty() {
            debug!(verse = %verse, record = record.identifier(), "record_without_pair");
            continue;
        }
        alignments.push(AlignmentPair {
            record_id: record.identifier().to_string(),
            sources: resolved_sources,
            targets: resolved_targets,
        });
    }

    let data = VerseData::new(verse.clone(), alignments, verse_sources, verse_targets);
    Ok((data, dropped))
}

#[allow(clippy::too_many_arguments)]
fn resolve<T: Token>(
    verse: &VerseRef,
    record: &AlignmentRecord,
    selectors: &[String],
    inventory: &impl Keyed<T>,
    scope: &HashSet<&str>,
    role: &'static str,
    cfg: &AggregateConfig,
    dropped: &mut usize,
) -> Result<Vec<T>, AggregateError> {
    let mut out = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let token = inventory
            .lookup(selector)
            .filter(|_| !cfg.verse_scoped || scope.contains(selector.as_str()));
        match (token, cfg.missing_selector) {
            (Some(token), _) => out.push(token.clone()),
            (None, SelectorPolicy::Fail) => {
                return Err(AggregateError::UnresolvedSelector {
                    verse: verse.to_string(),
                    record: record.identifier().to_string(),
                    role,
                    selector: selector.clone(),
                })
            }
            (None, policy) => {
                *dropped += 1;
                if policy == SelectorPolicy::Warn {
                    warn!(verse = %verse, record = record.identifier(), role, selector = %selector, "selector_dropped");
                }
            }
        }
    }
    Ok(out)
}

/// Groups tokens and records by verse and builds one [`VerseData`] per
/// verse that has records.
///
/// Records are keyed by the verse of their first source selector. Only
/// verses present in the source inventory are produced.
pub fn aggregate<'r>(
    records: impl IntoIterator<Item = &'r AlignmentRecord>,
    sources: &TokenInventory<Source>,
    targets: &TokenInventory<Target>,
    cfg: &AggregateConfig,
) -> Result<Aggregation, AggregateError> {
    let start = Instant::now();
    let token_verse = |t: &&Source| Some(t.verse_ref().clone());
    let (verse_sources, _) = group_by_verse(sources.tokens(), token_verse, cfg.sort_input);
    let (verse_targets, _) = group_by_verse(targets.tokens(), |t: &&Target| Some(t.verse_ref().clone()), cfg.sort_input);
    let (verse_records, skipped_records) = group_by_verse(records, |r: &&AlignmentRecord| r.source_bcv(), cfg.sort_input);

    let mut out = Aggregation {
        stats: AggregationStats {
            skipped_records,
            ..Default::default()
        },
        ..Default::default()
    };
    if skipped_records > 0 {
        warn!(skipped_records, "records_without_source_verse");
    }

    for (verse, records) in &verse_records {
        let Some(verse_src) = verse_sources.get(verse) else {
            warn!(verse = %verse, records = records.len(), "verse_missing_from_sources");
            out.stats.orphan_verses += 1;
            continue;
        };
        let verse_src: Vec<Source> = verse_src.iter().map(|t| (*t).clone()).collect();
        let verse_trg: Vec<Target> = verse_targets
            .get(verse)
            .map(|ts| ts.iter().map(|t| (*t).clone()).collect())
            .unwrap_or_default();

        let (data, dropped) = make_verse_data(verse, records, sources, targets, verse_src, verse_trg, cfg)?;
        out.stats.dropped_selectors += dropped;
        out.stats.pairs += data.alignments().len();
        out.verses.insert(verse.clone(), data);
    }
    out.stats.verses = out.verses.len();

    info!(
        verses = out.stats.verses,
        pairs = out.stats.pairs,
        dropped_selectors = out.stats.dropped_selectors,
        skipped_records = out.stats.skipped_records,
        orphan_verses = out.stats.orphan_verses,
        elapsed_micros = start.elapsed().as_micros(),
        "aggregation_complete"
    );
    Ok(out)
}
