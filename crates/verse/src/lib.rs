//! Verse-level views of alignment data.
//!
//! Clean alignment records are grouped by the verse of their source tokens
//! and each selector is resolved to its token:
//!
//! ```text
//! records ──group_by_verse──▶ verse → [record]
//!                                │
//!                  make_verse_data (resolve selectors)
//!                                ▼
//!                 VerseData { sources, targets, alignments }
//! ```
//!
//! A [`VerseData`] can be rendered as a table or grid and diffed against
//! another alignment of the same verse.

mod aggregate;
mod config;
mod error;
mod group;
mod verse_data;

pub use crate::aggregate::{aggregate, make_verse_data, Aggregation, AggregationStats};
pub use crate::config::{AggregateConfig, SelectorPolicy};
pub use crate::error::AggregateError;
pub use crate::group::{group_by, group_by_verse};
pub use crate::verse_data::{AlignmentGrid, AlignmentPair, DiffReason, DiffRecord, Side, VerseData};
