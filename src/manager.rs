//! The [`Manager`] runs every stage once and keeps the results.
//!
//! Construction is all-or-nothing: inventories are loaded, the alignment
//! group is read, records are partitioned into clean and bad sets, and the
//! clean records are aggregated by verse. Any stage failure returns a
//! [`PipelineError`] and no manager is built. The finished manager is a
//! read-only snapshot.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::time::Instant;

use burrito::{AlignmentGroup, AlignmentRecord, AlignmentType, BurritoError, Document, ReaderConfig, RecordMap};
use serde::{Deserialize, Serialize};
use tokens::{
    CaseSensitivity, InventoryConfig, Keyed, SourceInventory, TargetInventory, Token, TokenInventory, VerseRef,
};
use tracing::{info, warn, Level};
use validate::{partition, BadRecord, Reason, ValidateConfig};
use verse::{aggregate, AggregateConfig, AggregationStats, VerseData};

use crate::alignment_set::AlignmentSet;
use crate::{run_stage, MetricsSpan, PipelineError, PipelineStage};

const UNALIGNED_EXAMPLES: usize = 5;

/// Stage settings for building a [`Manager`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub inventory: InventoryConfig,
    pub reader: ReaderConfig,
    pub validate: ValidateConfig,
    pub aggregate: AggregateConfig,
}

/// Consistency findings reported by [`Manager::check_integrity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// Aggregated pairs and clean records disagree, so some records were
    /// dropped or lost a side during aggregation.
    PairCountMismatch { pairs: usize, records: usize },
    /// A clean record points at a verse with no source tokens.
    VerseNotInSources { verse: VerseRef },
    /// Source verses that no alignment covers.
    UnalignedSourceVerses { count: usize, examples: Vec<VerseRef> },
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::PairCountMismatch { pairs, records } => {
                write!(f, "{pairs} aligned pairs for {records} clean records")
            }
            IntegrityWarning::VerseNotInSources { verse } => {
                write!(f, "verse {verse} has alignments but no source tokens")
            }
            IntegrityWarning::UnalignedSourceVerses { count, examples } => {
                let shown: Vec<&str> = examples.iter().map(VerseRef::as_str).collect();
                write!(f, "{count} source verses have no alignments, e.g. {shown:?}")
            }
        }
    }
}

/// Loaded and validated alignment data, indexed by verse.
#[derive(Debug, Clone)]
pub struct Manager {
    alignment_set: Option<AlignmentSet>,
    sources: SourceInventory,
    targets: TargetInventory,
    // holds only the clean records
    alignment_group: AlignmentGroup,
    clean: RecordMap<AlignmentRecord>,
    bad: RecordMap<BadRecord>,
    bad_counts: BTreeMap<Reason, usize>,
    verses: BTreeMap<VerseRef, VerseData>,
    stats: AggregationStats,
}

impl Manager {
    /// Reads the files of `set` and builds a manager from them.
    pub fn from_alignment_set(set: &AlignmentSet, cfg: &ManagerConfig) -> Result<Self, PipelineError> {
        set.validate()?;
        cfg.inventory.validate()?;
        cfg.reader.validate()?;

        let identifier = set.identifier();
        let span = tracing::span!(
            Level::INFO,
            "manager.load",
            alignment_set = %identifier,
            language = %set.target_language
        );
        let _guard = span.enter();
        info!(paths = %set.display_str(), "alignment_set_paths");

        let (sources, targets) = run_stage(PipelineStage::Inventories, || {
            let sources: SourceInventory = TokenInventory::load(set.source_path(), &cfg.inventory)?;
            let targets: TargetInventory = TokenInventory::load(set.target_path(), &cfg.inventory)?;
            Ok::<_, PipelineError>((sources, targets))
        })?;

        let documents = vec![
            Document::new(set.source_id.as_str(), cfg.reader.scheme),
            Document::new(set.target_id.as_str(), cfg.reader.scheme),
        ];
        let group = run_stage(PipelineStage::Alignments, || {
            burrito::read_alignment_group(set.alignment_path(), documents, &cfg.reader)
        })?;

        let mut manager = Self::from_parts(sources, targets, group, cfg)?;
        manager.alignment_set = Some(set.clone());
        Ok(manager)
    }

    /// Validates and aggregates an already-loaded group against the two
    /// inventories.
    pub fn from_parts(
        sources: SourceInventory,
        targets: TargetInventory,
        group: AlignmentGroup,
        cfg: &ManagerConfig,
    ) -> Result<Self, PipelineError> {
        let span = tracing::span!(
            Level::INFO,
            "manager.build",
            records = group.len(),
            sources = sources.len(),
            targets = targets.len()
        );
        let _guard = span.enter();
        let start = Instant::now();

        if group.kind() != AlignmentType::Translation {
            return Err(PipelineError::UnsupportedType(group.kind()));
        }

        let validation = MetricsSpan::start(PipelineStage::Validation);
        let parts = partition(group.records().iter().cloned(), &sources, &targets, &cfg.validate);
        if let Some(span) = validation {
            span.finish(true);
        }

        let aggregation = run_stage(PipelineStage::Aggregation, || {
            aggregate(parts.clean.values(), &sources, &targets, &cfg.aggregate)
        })?;

        let alignment_group = group.with_records(parts.clean.values().cloned().collect());
        info!(
            clean = parts.clean.len(),
            bad = parts.bad.len(),
            verses = aggregation.stats.verses,
            pairs = aggregation.stats.pairs,
            elapsed_micros = start.elapsed().as_micros(),
            "manager_ready"
        );

        Ok(Self {
            alignment_set: None,
            sources,
            targets,
            alignment_group,
            clean: parts.clean,
            bad: parts.bad,
            bad_counts: parts.counts,
            verses: aggregation.verses,
            stats: aggregation.stats,
        })
    }

    /// Verse data for an 8-digit `BBCCCVVV` reference.
    pub fn get(&self, verse: &str) -> Result<&VerseData, PipelineError> {
        self.verses
            .get(verse)
            .ok_or_else(|| PipelineError::VerseNotFound(verse.to_string()))
    }

    pub fn contains_verse(&self, verse: &str) -> bool {
        self.verses.contains_key(verse)
    }

    /// All verse data in canonical verse order.
    pub fn verses(&self) -> impl Iterator<Item = &VerseData> {
        self.verses.values()
    }

    /// Clean records whose `role` selectors include a token with
    /// `attribute == term` in that role's inventory.
    ///
    /// A `target` search matches against target selectors rather than
    /// source selectors, since target token ids never appear among the
    /// source selectors of a record.
    pub fn token_alignments(
        &self,
        term: &str,
        role: &str,
        attribute: &str,
        case: CaseSensitivity,
    ) -> Result<Vec<&AlignmentRecord>, PipelineError> {
        let ids: HashSet<&str> = match role {
            "source" => self
                .sources
                .term_tokens(term, attribute, case)?
                .into_iter()
                .map(Token::id)
                .collect(),
            "target" => self
                .targets
                .term_tokens(term, attribute, case)?
                .into_iter()
                .map(Token::id)
                .collect(),
            other => {
                return Err(PipelineError::Burrito(BurritoError::UnknownRole {
                    role: other.to_string(),
                    kind: AlignmentType::Translation.tag().to_string(),
                }))
            }
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for record in self.clean.values() {
            if record.selectors(role)?.iter().any(|sel| ids.contains(sel.as_str())) {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// Cross-checks clean records, aggregated verses and the source
    /// inventory. Each warning is also logged.
    pub fn check_integrity(&self) -> Vec<IntegrityWarning> {
        let mut warnings = Vec::new();

        if self.stats.pairs != self.clean.len() {
            warnings.push(IntegrityWarning::PairCountMismatch {
                pairs: self.stats.pairs,
                records: self.clean.len(),
            });
        }

        let source_verses = self.sources.verse_refs();
        let record_verses: BTreeSet<VerseRef> = self.clean.values().filter_map(AlignmentRecord::source_bcv).collect();
        for verse in record_verses {
            if !source_verses.contains(&verse) {
                warnings.push(IntegrityWarning::VerseNotInSources { verse });
            }
        }

        let unaligned: Vec<&VerseRef> = source_verses
            .iter()
            .copied()
            .filter(|verse| !self.verses.contains_key(*verse))
            .collect();
        if !unaligned.is_empty() {
            warnings.push(IntegrityWarning::UnalignedSourceVerses {
                count: unaligned.len(),
                examples: unaligned.iter().take(UNALIGNED_EXAMPLES).map(|v| (*v).clone()).collect(),
            });
        }

        for warning in &warnings {
            warn!(warning = %warning, "integrity_warning");
        }
        warnings
    }

    /// Multi-line listing of the tokens a record points at. Selectors that
    /// do not resolve show as `None`.
    pub fn describe_record(&self, record: &AlignmentRecord) -> String {
        let mut out = format!("{} ------------\n", record.identifier());
        for selector in record.source_selectors() {
            let shown = self.sources.get(selector).map(Token::display);
            out.push_str(&format!("Source: {}\n", shown.as_deref().unwrap_or("None")));
        }
        for selector in record.target_selectors() {
            let shown = self.targets.get(selector).map(Token::display);
            out.push_str(&format!("Target: {}\n", shown.as_deref().unwrap_or("None")));
        }
        out
    }

    pub fn alignment_set(&self) -> Option<&AlignmentSet> {
        self.alignment_set.as_ref()
    }

    pub fn sources(&self) -> &SourceInventory {
        &self.sources
    }

    pub fn targets(&self) -> &TargetInventory {
        &self.targets
    }

    /// The group as read, restricted to clean records.
    pub fn alignment_group(&self) -> &AlignmentGroup {
        &self.alignment_group
    }

    pub fn clean_records(&self) -> &RecordMap<AlignmentRecord> {
        &self.clean
    }

    pub fn bad_records(&self) -> &RecordMap<BadRecord> {
        &self.bad
    }

    /// Bad record counts per reason.
    pub fn bad_counts(&self) -> &BTreeMap<Reason, usize> {
        &self.bad_counts
    }

    pub fn aggregation_stats(&self) -> AggregationStats {
        self.stats
    }
}

impl Keyed<VerseData> for Manager {
    fn lookup(&self, key: &str) -> Option<&VerseData> {
        self.verses.get(key)
    }

    fn len(&self) -> usize {
        self.verses.len()
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.verses.keys().map(VerseRef::as_str))
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alignment_set {
            Some(set) => write!(f, "<Manager: {}, {} verses>", set.identifier(), self.verses.len()),
            None => write!(f, "<Manager: {} verses>", self.verses.len()),
        }
    }
}
