//! Source (manuscript) and target (translation) tokens.
//!
//! Tokens are built once from a raw row and never change afterwards. All
//! normalization happens in the `TryFrom<Raw*>` conversions:
//!
//! ```text
//! RawSource ──TryFrom──▶ Source   (id checked, NFKC for NT, Strong's normalized)
//! RawTarget ──TryFrom──▶ Target   (id checked, source_verse defaulted)
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::warn;
use unicode_normalization::UnicodeNormalization;

use crate::bcvwp::{BcvwpId, VerseRef};
use crate::error::TokenError;
use crate::inventory::Row;
use crate::strongs::normalize_strongs;

/// Common surface of [`Source`] and [`Target`].
pub trait Token: Clone + fmt::Debug + Send + Sync + 'static {
    /// Short label used in logs, e.g. `"source"`.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn text(&self) -> &str;
    fn alt_id(&self) -> &str;
    fn verse_ref(&self) -> &VerseRef;

    /// Value of a named string attribute, `None` if the attribute does not
    /// exist for this token type.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// One-line rendering of the key fields.
    fn display(&self) -> String;

    fn from_row(row: &Row<'_>) -> Result<Self, TokenError>;

    /// Identifier minus any canon prefix.
    fn bare_id(&self) -> &str {
        let id = self.id();
        match id.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => &id[1..],
            _ => id,
        }
    }

    fn id_text(&self) -> (&str, &str) {
        (self.id(), self.text())
    }

    /// True when the surface text is empty, which is not normal.
    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

/// Unnormalized manuscript token fields, named like the TSV columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSource {
    pub id: String,
    #[serde(rename = "altId")]
    pub alt_id: String,
    pub text: String,
    #[serde(rename = "strongs", alias = "strong")]
    pub strong: String,
    pub gloss: String,
    pub gloss2: String,
    pub lemma: String,
    pub pos: String,
    pub morph: String,
}

/// A manuscript token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    id: String,
    #[serde(skip)]
    verse: VerseRef,
    #[serde(rename = "altId")]
    alt_id: String,
    text: String,
    #[serde(rename = "strongs")]
    strong: String,
    gloss: String,
    gloss2: String,
    lemma: String,
    pos: String,
    morph: String,
}

const CONTENT_POS: [&str; 4] = ["noun", "verb", "adj", "adv"];

impl Source {
    pub fn strong(&self) -> &str {
        &self.strong
    }

    pub fn gloss(&self) -> &str {
        &self.gloss
    }

    pub fn gloss2(&self) -> &str {
        &self.gloss2
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn pos(&self) -> &str {
        &self.pos
    }

    pub fn morph(&self) -> &str {
        &self.morph
    }

    /// True for content-bearing parts of speech: noun, verb, adj, adv.
    pub fn is_content(&self) -> bool {
        CONTENT_POS.contains(&self.pos.as_str())
    }

    pub fn is_noun(&self) -> bool {
        self.pos == "noun"
    }
}

impl TryFrom<RawSource> for Source {
    type Error = TokenError;

    fn try_from(raw: RawSource) -> Result<Self, Self::Error> {
        let parsed = BcvwpId::parse(&raw.id)?;
        let is_nt = parsed.is_nt();
        // Greek is normalized for NT books only: NFKC is wrong for pointed Hebrew.
        let nfkc = |s: String| if is_nt { s.nfkc().collect() } else { s };

        let mut strong = raw.strong;
        if !strong.is_empty() {
            let prefix = if is_nt { 'G' } else { 'H' };
            match normalize_strongs(&strong, Some(prefix), false) {
                Ok(normed) => strong = normed,
                Err(err) => warn!(id = %raw.id, strong = %strong, error = %err, "strongs_normalization_failed"),
            }
        }

        Ok(Self {
            verse: parsed.verse_ref(),
            id: raw.id,
            alt_id: nfkc(raw.alt_id),
            text: nfkc(raw.text),
            strong,
            gloss: raw.gloss,
            gloss2: raw.gloss2,
            lemma: nfkc(raw.lemma),
            pos: raw.pos,
            morph: raw.morph,
        })
    }
}

impl Token for Source {
    const KIND: &'static str = "source";

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn alt_id(&self) -> &str {
        &self.alt_id
    }

    fn verse_ref(&self) -> &VerseRef {
        &self.verse
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        let value = match name {
            "id" => &self.id,
            "altId" => &self.alt_id,
            "text" => &self.text,
            "strong" | "strongs" => &self.strong,
            "gloss" => &self.gloss,
            "gloss2" => &self.gloss2,
            "lemma" => &self.lemma,
            "pos" => &self.pos,
            "morph" => &self.morph,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn display(&self) -> String {
        format!(
            "{}: {}\t\t ({}, {}, {})",
            self.id, self.text, self.gloss, self.lemma, self.pos
        )
    }

    fn from_row(row: &Row<'_>) -> Result<Self, TokenError> {
        let raw = RawSource {
            id: row.get("id").to_string(),
            alt_id: row.get("altId").to_string(),
            text: row.get("text").to_string(),
            strong: row.first_of(&["strongs", "strong"]).to_string(),
            gloss: row.get("gloss").to_string(),
            gloss2: row.get("gloss2").to_string(),
            lemma: row.get("lemma").to_string(),
            pos: row.get("pos").to_string(),
            morph: row.get("morph").to_string(),
        };
        Source::try_from(raw)
    }
}

impl Hash for Source {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Unnormalized translation token fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTarget {
    pub id: String,
    #[serde(rename = "altId")]
    pub alt_id: String,
    pub text: String,
    pub source_verse: String,
    pub skip_space_after: bool,
    pub exclude: bool,
    #[serde(rename = "transType")]
    pub trans_type: String,
    #[serde(rename = "isPunc")]
    pub is_punc: bool,
    #[serde(rename = "isPrimary")]
    pub is_primary: bool,
    #[serde(rename = "msId")]
    pub ms_id: String,
}

/// A translation token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    id: String,
    #[serde(skip)]
    verse: VerseRef,
    #[serde(rename = "altId")]
    alt_id: String,
    text: String,
    source_verse: String,
    skip_space_after: bool,
    exclude: bool,
    #[serde(rename = "transType")]
    trans_type: String,
    #[serde(rename = "isPunc")]
    is_punc: bool,
    #[serde(rename = "isPrimary")]
    is_primary: bool,
    #[serde(rename = "msId")]
    ms_id: String,
}

impl Target {
    /// Verse of the corresponding source text.
    pub fn source_verse(&self) -> &str {
        &self.source_verse
    }

    /// Text displays should not add a space after this token.
    pub fn skip_space_after(&self) -> bool {
        self.skip_space_after
    }

    /// Token is not eligible for alignment.
    pub fn exclude(&self) -> bool {
        self.exclude
    }

    pub fn trans_type(&self) -> &str {
        &self.trans_type
    }

    pub fn is_punc(&self) -> bool {
        self.is_punc
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn ms_id(&self) -> &str {
        &self.ms_id
    }
}

impl TryFrom<RawTarget> for Target {
    type Error = TokenError;

    fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
        let verse = BcvwpId::parse(&raw.id)?.verse_ref();
        let source_verse = if raw.source_verse.is_empty() {
            verse.to_string()
        } else {
            raw.source_verse
        };
        Ok(Self {
            id: raw.id,
            verse,
            alt_id: raw.alt_id,
            text: raw.text,
            source_verse,
            skip_space_after: raw.skip_space_after,
            exclude: raw.exclude,
            trans_type: raw.trans_type,
            is_punc: raw.is_punc,
            is_primary: raw.is_primary,
            ms_id: raw.ms_id,
        })
    }
}

impl Token for Target {
    const KIND: &'static str = "target";

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn alt_id(&self) -> &str {
        &self.alt_id
    }

    fn verse_ref(&self) -> &VerseRef {
        &self.verse
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        let value = match name {
            "id" => &self.id,
            "altId" => &self.alt_id,
            "text" => &self.text,
            "source_verse" => &self.source_verse,
            "transType" => &self.trans_type,
            "msId" => &self.ms_id,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn display(&self) -> String {
        format!(
            "{}: {}\t\t ('{}', {}, {})",
            self.id, self.text, self.trans_type, self.is_punc, self.is_primary
        )
    }

    fn from_row(row: &Row<'_>) -> Result<Self, TokenError> {
        let raw = RawTarget {
            id: row.get("id").to_string(),
            alt_id: row.get("altId").to_string(),
            text: row.get("text").to_string(),
            source_verse: row.get("source_verse").to_string(),
            skip_space_after: parse_flag(row.get("skip_space_after")),
            exclude: parse_flag(row.get("exclude")),
            trans_type: row.get("transType").to_string(),
            is_punc: parse_flag(row.get("isPunc")),
            is_primary: parse_flag(row.get("isPrimary")),
            ms_id: row.get("msId").to_string(),
        };
        Target::try_from(raw)
    }
}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Flag columns are true only for `y` or `true`, in any case.
pub fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("y") || value.eq_ignore_ascii_case("true")
}
