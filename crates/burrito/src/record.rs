use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::{Map, Value};
use tokens::{to_bcv, VerseRef};

use crate::alignment_type::AlignmentType;
use crate::error::BurritoError;
use crate::metadata::Metadata;
use crate::reference::AlignmentReference;

/// One alignment: a reference per role of its type, plus metadata.
///
/// Equality and hashing use only the record identifier (`meta.id`).
#[derive(Debug, Clone)]
pub struct AlignmentRecord {
    meta: Metadata,
    kind: AlignmentType,
    // in `kind.roles()` order
    references: Vec<AlignmentReference>,
}

impl AlignmentRecord {
    /// Builds a record from role-keyed references. The roles must be exactly
    /// the roles of `kind`, in any order.
    pub fn new(
        meta: Metadata,
        references: impl IntoIterator<Item = (String, AlignmentReference)>,
        kind: AlignmentType,
    ) -> Result<Self, BurritoError> {
        let mut keyed: Vec<(String, AlignmentReference)> = references.into_iter().collect();
        let roles = kind.roles();
        let mismatch = || BurritoError::RoleMismatch {
            kind: kind.tag().into(),
            expected: roles.iter().map(|r| r.to_string()).collect(),
            found: keyed.iter().map(|(role, _)| role.clone()).collect(),
        };
        if keyed.len() != roles.len() {
            return Err(mismatch());
        }
        let mut ordered = Vec::with_capacity(roles.len());
        for role in roles {
            match keyed.iter().position(|(r, _)| r == role) {
                Some(pos) => ordered.push(pos),
                None => return Err(mismatch()),
            }
        }
        // positions are distinct because the lengths match and every role was found
        let mut slots: Vec<Option<AlignmentReference>> = keyed.drain(..).map(|(_, r)| Some(r)).collect();
        let references = ordered.into_iter().filter_map(|pos| slots[pos].take()).collect();
        Ok(Self { meta, kind, references })
    }

    /// A translation record, the only shape the pipeline consumes.
    pub fn translation(meta: Metadata, source: AlignmentReference, target: AlignmentReference) -> Self {
        Self {
            meta,
            kind: AlignmentType::Translation,
            references: vec![source, target],
        }
    }

    pub fn identifier(&self) -> &str {
        &self.meta.id
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    pub fn kind(&self) -> AlignmentType {
        self.kind
    }

    pub fn roles(&self) -> &'static [&'static str] {
        self.kind.roles()
    }

    pub fn reference(&self, role: &str) -> Option<&AlignmentReference> {
        let pos = self.roles().iter().position(|r| *r == role)?;
        self.references.get(pos)
    }

    /// Selectors for `role`, or `UnknownRole` if the type has no such role.
    pub fn selectors(&self, role: &str) -> Result<&[String], BurritoError> {
        self.reference(role)
            .map(AlignmentReference::selectors)
            .ok_or_else(|| BurritoError::UnknownRole {
                role: role.into(),
                kind: self.kind.tag().into(),
            })
    }

    /// Source selectors; empty for types without a `source` role.
    pub fn source_selectors(&self) -> &[String] {
        self.selectors("source").unwrap_or(&[])
    }

    pub fn target_selectors(&self) -> &[String] {
        self.selectors("target").unwrap_or(&[])
    }

    /// Verse of the first source selector. Every selector of a well-formed
    /// record shares it.
    pub fn source_bcv(&self) -> Option<VerseRef> {
        self.source_selectors().first().and_then(|sel| to_bcv(sel).ok())
    }

    pub fn incomplete(&self) -> bool {
        self.references.iter().any(AlignmentReference::incomplete)
    }

    /// Role-keyed `{"source": [...], "target": [...]}`, or with `positional`
    /// a single `"references"` list in role order. `with_meta` adds the
    /// record metadata.
    pub fn to_value(&self, positional: bool, with_meta: bool) -> Value {
        let mut out = Map::new();
        if positional {
            let refs = self.references.iter().map(|r| Value::from(r.selectors().to_vec())).collect();
            out.insert("references".into(), Value::Array(refs));
        } else {
            for (role, reference) in self.roles().iter().zip(&self.references) {
                out.insert((*role).into(), Value::from(reference.selectors().to_vec()));
            }
        }
        if with_meta {
            out.insert("meta".into(), self.meta.to_value());
        }
        Value::Object(out)
    }
}

impl PartialEq for AlignmentRecord {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
    }
}

impl Eq for AlignmentRecord {}

impl Hash for AlignmentRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
    }
}

impl fmt::Display for AlignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<AlignmentRecord {}:", self.identifier())?;
        for reference in &self.references {
            write!(f, " {reference}")?;
        }
        f.write_str(">")
    }
}
