//! Ordered, read-only token inventories loaded from TSV.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::bcvwp::VerseRef;
use crate::config::InventoryConfig;
use crate::error::InventoryError;
use crate::keyed::Keyed;
use crate::token::Token;

/// Whether term and vocabulary queries fold case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

/// One TSV row, addressed by column name.
///
/// Missing columns read as the empty string. The configured identifier
/// column is always reachable as `"id"`.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    fields: HashMap<&'a str, &'a str>,
}

impl<'a> Row<'a> {
    pub fn new(headers: &[&'a str], values: &[&'a str], id_header: &str) -> Self {
        let mut fields = HashMap::with_capacity(headers.len() + 1);
        for (i, header) in headers.iter().enumerate() {
            fields.insert(*header, values.get(i).copied().unwrap_or(""));
        }
        if id_header != "id" {
            let id = fields.get(id_header).copied().unwrap_or("");
            fields.insert("id", id);
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> &'a str {
        self.fields.get(name).copied().unwrap_or("")
    }

    /// Value of the first present column among `names`.
    pub fn first_of(&self, names: &[&str]) -> &'a str {
        names
            .iter()
            .find_map(|name| self.fields.get(*name).copied())
            .unwrap_or("")
    }
}

/// Identifier → token mapping in file order.
///
/// Built once and never mutated afterwards. A repeated identifier replaces
/// the earlier token in place, keeping the first position.
#[derive(Debug, Clone)]
pub struct TokenInventory<T> {
    label: String,
    tokens: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T: Token> TokenInventory<T> {
    /// Loads a tab-separated file with a header row.
    pub fn load(path: impl AsRef<Path>, cfg: &InventoryConfig) -> Result<Self, InventoryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| InventoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string(), cfg)
    }

    /// Loads tokens from any buffered TSV reader. `label` names the input in
    /// errors and logs.
    pub fn from_reader<R: BufRead>(reader: R, label: &str, cfg: &InventoryConfig) -> Result<Self, InventoryError> {
        let start = Instant::now();
        let io_err = |source| InventoryError::Io {
            path: label.to_string(),
            source,
        };

        let mut lines = reader.lines();
        let header_line = match lines.next() {
            Some(line) => line.map_err(io_err)?,
            None => return Err(InventoryError::EmptyFile { label: label.into() }),
        };
        let header_line = header_line.trim_end_matches('\r').to_string();
        let headers: Vec<&str> = header_line.split('\t').collect();
        if !headers.contains(&cfg.id_header.as_str()) {
            return Err(InventoryError::MissingIdColumn {
                label: label.into(),
                header: cfg.id_header.clone(),
            });
        }

        let mut inventory = Self::empty(label);
        for (offset, line) in lines.enumerate() {
            let line = line.map_err(io_err)?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let values: Vec<&str> = line.split('\t').collect();
            let row = Row::new(&headers, &values, &cfg.id_header);
            let token = T::from_row(&row).map_err(|source| InventoryError::InvalidRow {
                label: label.into(),
                // header is line 1
                line: offset + 2,
                source,
            })?;
            inventory.insert(token);
        }

        info!(
            label,
            kind = T::KIND,
            tokens = inventory.tokens.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "inventory_loaded"
        );
        Ok(inventory)
    }

    /// Builds an inventory from already-constructed tokens.
    pub fn from_tokens(label: &str, tokens: impl IntoIterator<Item = T>) -> Self {
        let mut inventory = Self::empty(label);
        for token in tokens {
            inventory.insert(token);
        }
        inventory
    }

    fn empty(label: &str) -> Self {
        Self {
            label: label.to_string(),
            tokens: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, token: T) {
        match self.index.get(token.id()) {
            Some(&pos) => {
                warn!(label = %self.label, id = token.id(), "duplicate_token_id");
                self.tokens[pos] = token;
            }
            None => {
                self.index.insert(token.id().to_string(), self.tokens.len());
                self.tokens.push(token);
            }
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.tokens[pos])
    }

    /// Tokens in inventory order.
    pub fn tokens(&self) -> impl Iterator<Item = &T> {
        self.tokens.iter()
    }

    /// Distinct verse references covered by the inventory.
    pub fn verse_refs(&self) -> BTreeSet<&VerseRef> {
        self.tokens.iter().map(Token::verse_ref).collect()
    }

    /// Tokens whose `attribute` equals `term` exactly. Empty attribute values
    /// never match.
    pub fn term_tokens(&self, term: &str, attribute: &str, case: CaseSensitivity) -> Result<Vec<&T>, InventoryError> {
        self.check_attribute(attribute)?;
        let wanted = fold(term, case);
        Ok(self
            .tokens
            .iter()
            .filter(|token| match token.attribute(attribute) {
                Some(value) if !value.is_empty() => fold(value, case) == wanted,
                _ => false,
            })
            .collect())
    }

    /// Sorted unique non-empty values of `attribute`.
    pub fn vocabulary(&self, attribute: &str, case: CaseSensitivity) -> Result<Vec<String>, InventoryError> {
        self.check_attribute(attribute)?;
        let values: BTreeSet<String> = self
            .tokens
            .iter()
            .filter_map(|token| token.attribute(attribute))
            .filter(|value| !value.is_empty())
            .map(|value| fold(value, case))
            .collect();
        Ok(values.into_iter().collect())
    }

    fn check_attribute(&self, attribute: &str) -> Result<(), InventoryError> {
        match self.tokens.first() {
            Some(token) if token.attribute(attribute).is_none() => {
                Err(InventoryError::UnknownAttribute(attribute.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn fold(value: &str, case: CaseSensitivity) -> String {
    match case {
        CaseSensitivity::Sensitive => value.to_string(),
        CaseSensitivity::Insensitive => value.to_lowercase(),
    }
}

impl<T: Token> Keyed<T> for TokenInventory<T> {
    fn lookup(&self, key: &str) -> Option<&T> {
        self.get(key)
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.tokens.iter().map(Token::id))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::TokenError;
    use crate::token::{Source, Target};

    const SOURCE_TSV: &str = "id\taltId\ttext\tstrongs\tgloss\tgloss2\tlemma\tpos\tmorph\n\
n41004003001\tἈκούετε-1\tἈκούετε\t191\tListen\t\tἀκούω\tverb\tV-PAM-2P\n\
n41004003002\tἰδοὺ-1\tἰδοὺ\t2400\tbehold\t\tἰδού\tintj\tINJ\n\
\n\
n41004003003\tἐξῆλθεν-1\tἐξῆλθεν\t1831\twent out\t\tἐξέρχομαι\tverb\tV-2AAI-3S\n";

    fn sources() -> TokenInventory<Source> {
        TokenInventory::from_reader(Cursor::new(SOURCE_TSV), "sources", &InventoryConfig::default())
            .expect("valid inventory")
    }

    #[test]
    fn loads_in_file_order_and_skips_blank_lines() {
        let inv = sources();
        assert_eq!(inv.len(), 3);
        let ids: Vec<&str> = inv.keys().collect();
        assert_eq!(ids, vec!["n41004003001", "n41004003002", "n41004003003"]);
        assert_eq!(inv.get("n41004003002").map(Source::gloss), Some("behold"));
        assert_eq!(inv.verse_refs().len(), 1);
    }

    #[test]
    fn term_tokens_match_exactly() {
        let inv = sources();
        let verbs = inv.term_tokens("verb", "pos", CaseSensitivity::Sensitive).unwrap();
        assert_eq!(verbs.len(), 2);
        let none = inv.term_tokens("VERB", "pos", CaseSensitivity::Sensitive).unwrap();
        assert!(none.is_empty());
        let folded = inv.term_tokens("VERB", "pos", CaseSensitivity::Insensitive).unwrap();
        assert_eq!(folded.len(), 2);
        // empty gloss2 never matches an empty term
        assert!(inv.term_tokens("", "gloss2", CaseSensitivity::Sensitive).unwrap().is_empty());
    }

    #[test]
    fn vocabulary_is_sorted_and_unique() {
        let inv = sources();
        assert_eq!(inv.vocabulary("pos", CaseSensitivity::Sensitive).unwrap(), vec!["intj", "verb"]);
        assert!(inv.vocabulary("gloss2", CaseSensitivity::Sensitive).unwrap().is_empty());
        assert!(matches!(
            inv.vocabulary("colour", CaseSensitivity::Sensitive),
            Err(InventoryError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn missing_id_column_is_fatal() {
        let tsv = "token\ttext\n41004003001\tHe\n";
        let res = TokenInventory::<Target>::from_reader(Cursor::new(tsv), "targets", &InventoryConfig::default());
        assert!(matches!(res, Err(InventoryError::MissingIdColumn { .. })));
    }

    #[test]
    fn custom_id_header() {
        let tsv = "token\ttext\n41004003001\tHe\n";
        let inv = TokenInventory::<Target>::from_reader(Cursor::new(tsv), "targets", &InventoryConfig::new("token"))
            .expect("valid inventory");
        assert!(inv.contains_key("41004003001"));
    }

    #[test]
    fn invalid_row_reports_line_number() {
        let tsv = "id\ttext\n41004003001\tHe\nbogus\tsaid\n";
        let res = TokenInventory::<Target>::from_reader(Cursor::new(tsv), "targets", &InventoryConfig::default());
        match res {
            Err(InventoryError::InvalidRow { line, source, .. }) => {
                assert_eq!(line, 3);
                assert!(matches!(source, TokenError::InvalidIdentifier(_)));
            }
            other => panic!("expected InvalidRow, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_last_write_wins_in_place() {
        let tsv = "id\ttext\n41004003001\tHe\n41004003002\tsaid\n41004003001\tJesus\n";
        let inv = TokenInventory::<Target>::from_reader(Cursor::new(tsv), "targets", &InventoryConfig::default())
            .expect("valid inventory");
        assert_eq!(inv.len(), 2);
        let texts: Vec<&str> = inv.tokens().map(Token::text).collect();
        assert_eq!(texts, vec!["Jesus", "said"]);
    }

    #[test]
    fn short_rows_pad_with_empty_values() {
        let tsv = "id\ttext\tisPunc\n41004003001\n";
        let inv = TokenInventory::<Target>::from_reader(Cursor::new(tsv), "targets", &InventoryConfig::default())
            .expect("valid inventory");
        let token = inv.get("41004003001").expect("token present");
        assert!(token.is_empty());
        assert!(!token.is_punc());
    }

    #[test]
    fn empty_input_is_an_error() {
        let res = TokenInventory::<Target>::from_reader(Cursor::new(""), "targets", &InventoryConfig::default());
        assert!(matches!(res, Err(InventoryError::EmptyFile { .. })));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("SBLGNT.tsv");
        std::fs::write(&path, SOURCE_TSV).expect("write fixture");
        let inv = TokenInventory::<Source>::load(&path, &InventoryConfig::default()).expect("load");
        assert_eq!(inv.len(), 3);

        let missing = TokenInventory::<Source>::load(dir.path().join("nope.tsv"), &InventoryConfig::default());
        assert!(matches!(missing, Err(InventoryError::Io { .. })));
    }
}
