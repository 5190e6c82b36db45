//! Alignment records in the Scripture Burrito alignment format.
//!
//! The information model lets some values (documents, metadata) appear at
//! several levels. This crate stores each value at the lowest level it
//! applies to and hoists as much as possible when serializing.
//!
//! ```text
//! AlignmentGroup ── documents[role], meta, type
//!   └─ AlignmentRecord ── meta (id, origin, status)
//!        └─ AlignmentReference[role] ── document, sorted selectors
//! ```

mod alignment_type;
mod config;
mod document;
mod error;
mod group;
mod metadata;
mod reader;
mod record;
mod record_map;
mod reference;

pub use crate::alignment_type::AlignmentType;
pub use crate::config::ReaderConfig;
pub use crate::document::{Canon, Document, Scheme, SourceId};
pub use crate::error::BurritoError;
pub use crate::group::AlignmentGroup;
pub use crate::metadata::{Metadata, DEFAULT_RECORD_STATUS};
pub use crate::reader::{build_alignment_group, read_alignment_group};
pub use crate::record::AlignmentRecord;
pub use crate::record_map::RecordMap;
pub use crate::reference::{AlignmentReference, MISSING_SELECTOR};
