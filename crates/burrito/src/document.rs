//! Documents, reference schemes and recognized manuscript ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Granularity of the selectors used for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scheme {
    Bcv,
    Bcvw,
    Bcvwp,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Bcv => "BCV",
            Scheme::Bcvw => "BCVW",
            Scheme::Bcvwp => "BCVWP",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Testament of a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Canon {
    #[serde(rename = "ot")]
    Ot,
    #[serde(rename = "nt")]
    Nt,
    /// Not a recognized source text.
    #[serde(rename = "X")]
    Unknown,
}

impl Canon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Canon::Ot => "ot",
            Canon::Nt => "nt",
            Canon::Unknown => "X",
        }
    }

    /// Canon for a manuscript id, `Unknown` if it is not recognized.
    pub fn for_source_id(id: &str) -> Self {
        SourceId::parse(id).map_or(Canon::Unknown, |source| source.canon())
    }
}

impl fmt::Display for Canon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manuscript editions this workspace knows how to align against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    #[serde(rename = "BGNT")]
    Bgnt,
    #[serde(rename = "NA27")]
    Na27,
    #[serde(rename = "NA28")]
    Na28,
    #[serde(rename = "SBLGNT")]
    Sblgnt,
    #[serde(rename = "WLC")]
    Wlc,
    #[serde(rename = "WLCM")]
    Wlcm,
}

impl SourceId {
    pub const ALL: [SourceId; 6] = [
        SourceId::Bgnt,
        SourceId::Na27,
        SourceId::Na28,
        SourceId::Sblgnt,
        SourceId::Wlc,
        SourceId::Wlcm,
    ];

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.as_str() == id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Bgnt => "BGNT",
            SourceId::Na27 => "NA27",
            SourceId::Na28 => "NA28",
            SourceId::Sblgnt => "SBLGNT",
            SourceId::Wlc => "WLC",
            SourceId::Wlcm => "WLCM",
        }
    }

    pub fn canon(&self) -> Canon {
        match self {
            SourceId::Wlc | SourceId::Wlcm => Canon::Ot,
            _ => Canon::Nt,
        }
    }
}

/// A document on one side of an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    docid: String,
    scheme: Scheme,
    source_id: Option<SourceId>,
}

impl Document {
    /// Only recognized manuscripts carry sub-word parts, so any other
    /// document asking for `BCVWP` is downgraded to `BCVW`.
    pub fn new(docid: impl Into<String>, scheme: Scheme) -> Self {
        let docid = docid.into();
        let source_id = SourceId::parse(&docid);
        let scheme = match (source_id, scheme) {
            (None, Scheme::Bcvwp) => Scheme::Bcvw,
            (_, scheme) => scheme,
        };
        Self {
            docid,
            scheme,
            source_id,
        }
    }

    pub fn docid(&self) -> &str {
        &self.docid
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn source_id(&self) -> Option<SourceId> {
        self.source_id
    }

    pub fn is_source(&self) -> bool {
        self.source_id.is_some()
    }

    pub fn to_value(&self) -> Value {
        json!({ "docid": self.docid, "scheme": self.scheme.as_str() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_sources_keep_bcvwp() {
        let doc = Document::new("SBLGNT", Scheme::Bcvwp);
        assert_eq!(doc.scheme(), Scheme::Bcvwp);
        assert_eq!(doc.source_id(), Some(SourceId::Sblgnt));
        assert_eq!(doc.source_id().map(|s| s.canon()), Some(Canon::Nt));
    }

    #[test]
    fn other_documents_downgrade_to_bcvw() {
        let doc = Document::new("BSB", Scheme::Bcvwp);
        assert_eq!(doc.scheme(), Scheme::Bcvw);
        assert!(!doc.is_source());
        assert_eq!(doc.to_value(), json!({"docid": "BSB", "scheme": "BCVW"}));

        let doc = Document::new("BSB", Scheme::Bcv);
        assert_eq!(doc.scheme(), Scheme::Bcv);
    }

    #[test]
    fn canon_lookup() {
        assert_eq!(Canon::for_source_id("WLCM"), Canon::Ot);
        assert_eq!(Canon::for_source_id("NA28"), Canon::Nt);
        assert_eq!(Canon::for_source_id("LEB"), Canon::Unknown);
        assert_eq!(Canon::Unknown.to_string(), "X");
    }
}
