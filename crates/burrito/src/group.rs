use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};
use tokens::VerseRef;
use tracing::warn;

use crate::alignment_type::AlignmentType;
use crate::document::{Canon, Document};
use crate::metadata::Metadata;
use crate::record::AlignmentRecord;

/// A full set of alignment records sharing one type and one pair of
/// documents.
#[derive(Debug, Clone)]
pub struct AlignmentGroup {
    // same order as `kind.roles()`
    documents: Vec<Document>,
    meta: Metadata,
    records: Vec<AlignmentRecord>,
    kind: AlignmentType,
    canon: Canon,
    source_docid: Option<String>,
}

impl AlignmentGroup {
    /// # Panics
    ///
    /// If records of more than one type are mixed, or if the number of
    /// documents differs from the number of roles. Both are caller bugs, not
    /// input errors; readers check the type tag before building a group.
    pub fn new(documents: Vec<Document>, meta: Metadata, records: Vec<AlignmentRecord>, kind: AlignmentType) -> Self {
        assert!(
            records.iter().all(|rec| rec.kind() == kind),
            "all records in a group must have type '{kind}'"
        );
        assert_eq!(
            documents.len(),
            kind.roles().len(),
            "documents and roles must have the same length"
        );

        let source = documents.iter().find_map(Document::source_id);
        let canon = source.map_or(Canon::Unknown, |s| s.canon());
        if source.is_none() {
            let docids: Vec<&str> = documents.iter().map(Document::docid).collect();
            warn!(?docids, "no_recognized_source_document");
        }

        Self {
            documents,
            meta,
            records,
            kind,
            canon,
            source_docid: source.map(|s| s.as_str().to_string()),
        }
    }

    /// Same documents, metadata and type, different records.
    pub fn with_records(&self, records: Vec<AlignmentRecord>) -> Self {
        Self::new(self.documents.clone(), self.meta.clone(), records, self.kind)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<AlignmentRecord> {
        self.records
    }

    pub fn kind(&self) -> AlignmentType {
        self.kind
    }

    pub fn roles(&self) -> &'static [&'static str] {
        self.kind.roles()
    }

    pub fn canon(&self) -> Canon {
        self.canon
    }

    pub fn source_docid(&self) -> Option<&str> {
        self.source_docid.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximally hoisted form: group metadata and type once, records
    /// without their own metadata.
    pub fn to_value(&self) -> Value {
        let records: Vec<Value> = self.records.iter().map(|rec| rec.to_value(false, false)).collect();
        json!({
            "meta": self.meta.to_value(),
            "type": self.kind.tag(),
            "records": records,
        })
    }

    /// Records by the verse of their first source selector. Records without
    /// a parseable source selector are left out.
    pub fn verse_records(&self) -> BTreeMap<VerseRef, Vec<&AlignmentRecord>> {
        let mut out: BTreeMap<VerseRef, Vec<&AlignmentRecord>> = BTreeMap::new();
        for record in &self.records {
            if let Some(bcv) = record.source_bcv() {
                out.entry(bcv).or_default().push(record);
            }
        }
        out
    }
}

impl fmt::Display for AlignmentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let docids: Vec<&str> = self.documents.iter().map(Document::docid).collect();
        write!(f, "<AlignmentGroup{docids:?}: {} records>", self.records.len())
    }
}
