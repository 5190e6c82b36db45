//! Workspace umbrella crate for Bible word-alignment data.
//!
//! This crate stitches the stage crates together behind a single
//! [`Manager`]: token inventories are loaded, alignment records are read and
//! validated against them, and the clean records are aggregated into a
//! verse-indexed view.
//!
//! ```text
//! sources.tsv ─┐
//! targets.tsv ─┼─▶ TokenInventory ×2 ─┐
//! alignments.json ─▶ AlignmentGroup ──┴─▶ partition ─▶ aggregate ─▶ Manager
//! ```

pub mod alignment_set;
pub mod config;
pub mod manager;

pub use burrito::{
    AlignmentGroup, AlignmentRecord, AlignmentReference, AlignmentType, BurritoError, Canon, Document,
    Metadata, ReaderConfig, RecordMap, Scheme, SourceId, build_alignment_group, read_alignment_group,
};
pub use tokens::{
    BcvwpId, CaseSensitivity, InventoryConfig, InventoryError, Keyed, Source, SourceInventory, Target,
    TargetInventory, Token, TokenError, TokenInventory, VerseRef, normalize_strongs, to_bcv,
};
pub use validate::{BadRecord, Finding, Partition, Reason, ValidateConfig, classify, partition};
pub use verse::{
    AggregateConfig, AggregateError, Aggregation, AggregationStats, AlignmentGrid, AlignmentPair, DiffReason,
    DiffRecord, SelectorPolicy, Side, VerseData, aggregate, group_by, group_by_verse, make_verse_data,
};

pub use crate::alignment_set::{AlignmentSet, AlignmentSetError};
pub use crate::config::{AlignmentsConfig, ConfigLoadError};
pub use crate::manager::{IntegrityWarning, Manager, ManagerConfig};

use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

/// Errors that can stop a [`Manager`] from being built or queried.
#[derive(Debug)]
pub enum PipelineError {
    Inventory(InventoryError),
    Burrito(BurritoError),
    Aggregate(AggregateError),
    InvalidAlignmentSet(AlignmentSetError),
    Config(ConfigLoadError),
    /// Only `translation` groups can be aggregated.
    UnsupportedType(AlignmentType),
    VerseNotFound(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Inventory(err) => write!(f, "token inventory failure: {err}"),
            PipelineError::Burrito(err) => write!(f, "alignment data failure: {err}"),
            PipelineError::Aggregate(err) => write!(f, "verse aggregation failure: {err}"),
            PipelineError::InvalidAlignmentSet(err) => write!(f, "invalid alignment set: {err}"),
            PipelineError::Config(err) => write!(f, "configuration failure: {err}"),
            PipelineError::UnsupportedType(kind) => {
                write!(f, "alignment type '{kind}' is not supported, expected 'translation'")
            }
            PipelineError::VerseNotFound(verse) => write!(f, "no alignment data for verse {verse}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Inventory(err) => Some(err),
            PipelineError::Burrito(err) => Some(err),
            PipelineError::Aggregate(err) => Some(err),
            PipelineError::InvalidAlignmentSet(err) => Some(err),
            PipelineError::Config(err) => Some(err),
            PipelineError::UnsupportedType(_) | PipelineError::VerseNotFound(_) => None,
        }
    }
}

impl From<InventoryError> for PipelineError {
    fn from(value: InventoryError) -> Self {
        PipelineError::Inventory(value)
    }
}

impl From<BurritoError> for PipelineError {
    fn from(value: BurritoError) -> Self {
        PipelineError::Burrito(value)
    }
}

impl From<AggregateError> for PipelineError {
    fn from(value: AggregateError) -> Self {
        PipelineError::Aggregate(value)
    }
}

impl From<AlignmentSetError> for PipelineError {
    fn from(value: AlignmentSetError) -> Self {
        PipelineError::InvalidAlignmentSet(value)
    }
}

impl From<ConfigLoadError> for PipelineError {
    fn from(value: ConfigLoadError) -> Self {
        PipelineError::Config(value)
    }
}

/// Stages reported to a [`PipelineMetrics`] recorder, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Inventories,
    Alignments,
    Validation,
    Aggregation,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Inventories => "inventories",
            PipelineStage::Alignments => "alignments",
            PipelineStage::Validation => "validation",
            PipelineStage::Aggregation => "aggregation",
        }
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_stage(&self, stage: PipelineStage, latency: Duration, ok: bool);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    stage: PipelineStage,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start(stage: PipelineStage) -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            stage,
            start: Instant::now(),
        })
    }

    pub(crate) fn finish(self, ok: bool) {
        self.recorder.record_stage(self.stage, self.start.elapsed(), ok);
    }
}

/// Runs `f` as `stage`, reporting its latency and outcome to the installed
/// recorder.
pub(crate) fn run_stage<T, E>(stage: PipelineStage, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    let span = MetricsSpan::start(stage);
    let result = f();
    if let Some(span) = span {
        span.finish(result.is_ok());
    }
    result
}
