use std::fmt;

use serde_json::{json, Value};

use crate::document::{Document, Scheme};

/// Placeholder selector used by upstream tools for an unknown token.
pub const MISSING_SELECTOR: &str = "MISSING";

/// Selectors into one document. Selectors are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlignmentReference {
    document: Document,
    selectors: Vec<String>,
}

impl AlignmentReference {
    pub fn new(document: Document, selectors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut selectors: Vec<String> = selectors.into_iter().map(Into::into).collect();
        selectors.sort();
        Self { document, selectors }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn docid(&self) -> &str {
        self.document.docid()
    }

    pub fn scheme(&self) -> Scheme {
        self.document.scheme()
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// True if any selector is the `MISSING` placeholder.
    pub fn incomplete(&self) -> bool {
        self.selectors.iter().any(|sel| sel == MISSING_SELECTOR)
    }

    /// With `hoist`, the document is assumed to be recorded higher up and
    /// only the selectors are written.
    pub fn to_value(&self, hoist: bool) -> Value {
        if hoist {
            json!({ "selectors": self.selectors })
        } else {
            json!({
                "selectors": self.selectors,
                "docid": self.docid(),
                "scheme": self.scheme().as_str(),
            })
        }
    }
}

impl fmt::Display for AlignmentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {:?}>", self.docid(), self.selectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_are_sorted_on_construction() {
        let reference = AlignmentReference::new(Document::new("SBLGNT", Scheme::Bcvwp), ["b", "a"]);
        assert_eq!(reference.selectors(), &["a", "b"]);
        assert_eq!(reference.to_string(), r#"<SBLGNT: ["a", "b"]>"#);
    }

    #[test]
    fn missing_placeholder_marks_incomplete() {
        let doc = Document::new("BSB", Scheme::Bcvw);
        assert!(AlignmentReference::new(doc.clone(), ["41004003001", "MISSING"]).incomplete());
        assert!(!AlignmentReference::new(doc, ["41004003001"]).incomplete());
    }

    #[test]
    fn hoisting_drops_document_fields() {
        let reference = AlignmentReference::new(Document::new("BSB", Scheme::Bcvwp), ["41004003001"]);
        assert_eq!(reference.to_value(true), json!({"selectors": ["41004003001"]}));
        assert_eq!(
            reference.to_value(false),
            json!({"selectors": ["41004003001"], "docid": "BSB", "scheme": "BCVW"})
        );
    }
}
