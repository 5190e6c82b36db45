use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;
use tokens::{Source, Target, Token, VerseRef};

/// Which token list of a verse to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Sources,
    Targets,
}

/// One resolved alignment: the source and target tokens of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentPair {
    pub record_id: String,
    pub sources: Vec<Source>,
    pub targets: Vec<Target>,
}

impl AlignmentPair {
    fn source_ids(&self) -> Vec<String> {
        self.sources.iter().map(|t| t.id().to_string()).collect()
    }

    fn target_ids(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.id().to_string()).collect()
    }
}

/// Alignments, sources and targets of one verse.
///
/// The verse is the source verse: targets from a versification that
/// differs are still listed under the source reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseData {
    verse: VerseRef,
    alignments: Vec<AlignmentPair>,
    sources: Vec<Source>,
    targets: Vec<Target>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffReason {
    DiffLen,
    DiffSources,
    DiffTargets,
}

impl DiffReason {
    pub fn message(&self) -> &'static str {
        match self {
            DiffReason::DiffLen => "Different number of alignments",
            DiffReason::DiffSources => "Source selectors differ",
            DiffReason::DiffTargets => "Target selectors differ",
        }
    }
}

/// One difference between the alignments of two [`VerseData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRecord {
    pub verse: VerseRef,
    pub reason: DiffReason,
    /// Token ids on each side of a differing pair; empty for `DiffLen`.
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl fmt::Display for DiffRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<DiffRecord ({}): '{}'", self.verse, self.reason.message())?;
        if !self.left.is_empty() || !self.right.is_empty() {
            write!(f, ", {:?} vs {:?}", self.left, self.right)?;
        }
        f.write_str(">")
    }
}

/// Source × target alignment matrix of a verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentGrid {
    /// Row labels: source texts in verse order.
    pub rows: Vec<String>,
    /// Column labels: unique target texts in verse order.
    pub columns: Vec<String>,
    /// `cells[row][column]` is true when the two tokens share a pair.
    pub cells: Vec<Vec<bool>>,
}

impl VerseData {
    pub fn new(verse: VerseRef, alignments: Vec<AlignmentPair>, sources: Vec<Source>, targets: Vec<Target>) -> Self {
        Self {
            verse,
            alignments,
            sources,
            targets,
        }
    }

    pub fn verse(&self) -> &VerseRef {
        &self.verse
    }

    pub fn alignments(&self) -> &[AlignmentPair] {
        &self.alignments
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Token texts of one side. With `unique`, a repeated text gets a
    /// `.N` suffix where N counts its earlier occurrences.
    pub fn get_texts(&self, side: Side, unique: bool) -> Vec<String> {
        let texts: Vec<&str> = match side {
            Side::Sources => self.sources.iter().map(Token::text).collect(),
            Side::Targets => self.targets.iter().map(Token::text).collect(),
        };
        if !unique {
            return texts.into_iter().map(str::to_string).collect();
        }
        let mut seen: HashMap<&str, usize> = HashMap::new();
        texts
            .into_iter()
            .map(|text| {
                let count = seen.entry(text).or_insert(0);
                let out = if *count == 0 {
                    text.to_string()
                } else {
                    format!("{text}.{count}")
                };
                *count += 1;
                out
            })
            .collect()
    }

    /// Differences against `other`. A different pair count is reported
    /// alone; otherwise pairs are compared in order by token ids.
    pub fn diff(&self, other: &VerseData) -> Vec<DiffRecord> {
        if self.alignments.len() != other.alignments.len() {
            return vec![DiffRecord {
                verse: self.verse.clone(),
                reason: DiffReason::DiffLen,
                left: Vec::new(),
                right: Vec::new(),
            }];
        }
        self.alignments
            .iter()
            .zip(&other.alignments)
            .filter_map(|(mine, theirs)| {
                let (left, right) = (mine.source_ids(), theirs.source_ids());
                if left != right {
                    return Some((DiffReason::DiffSources, left, right));
                }
                let (left, right) = (mine.target_ids(), theirs.target_ids());
                (left != right).then_some((DiffReason::DiffTargets, left, right))
            })
            .map(|(reason, left, right)| DiffRecord {
                verse: self.verse.clone(),
                reason,
                left,
                right,
            })
            .collect()
    }

    pub fn alignment_grid(&self) -> AlignmentGrid {
        let cells = self
            .sources
            .iter()
            .map(|src| {
                self.targets
                    .iter()
                    .map(|trg| {
                        self.alignments.iter().any(|pair| {
                            pair.sources.iter().any(|s| s.id() == src.id())
                                && pair.targets.iter().any(|t| t.id() == trg.id())
                        })
                    })
                    .collect()
            })
            .collect();
        AlignmentGrid {
            rows: self.sources.iter().map(|s| s.text().to_string()).collect(),
            columns: self.get_texts(Side::Targets, true),
            cells,
        }
    }

    /// The grid as tab-separated text, marking cells with `hit` or `miss`.
    pub fn render_grid(&self, hit: &str, miss: &str) -> String {
        let grid = self.alignment_grid();
        let mut out = String::new();
        let _ = writeln!(out, "\t{}", grid.columns.join("\t"));
        for (label, row) in grid.rows.iter().zip(&grid.cells) {
            let marks: Vec<&str> = row.iter().map(|&on| if on { hit } else { miss }).collect();
            let _ = writeln!(out, "{label}\t{}", marks.join("\t"));
        }
        out
    }

    /// One line per pair: source texts, a tab, target texts.
    pub fn table(&self) -> String {
        let mut out = String::new();
        for pair in &self.alignments {
            let sources: Vec<&str> = pair.sources.iter().map(Token::text).collect();
            let targets: Vec<&str> = pair.targets.iter().map(Token::text).collect();
            let _ = writeln!(out, "{}\t{}", sources.join(" "), targets.join(" "));
        }
        out
    }

    /// Readable listing of every pair, or only the pair texts with
    /// `terms_only`.
    pub fn display(&self, terms_only: bool) -> String {
        let mut out = String::new();
        for pair in &self.alignments {
            out.push_str("------------\n");
            if terms_only {
                let sources: Vec<&str> = pair.sources.iter().map(Token::text).collect();
                let targets: Vec<&str> = pair.targets.iter().map(Token::text).collect();
                let _ = writeln!(out, "{sources:?}-{targets:?}");
            } else {
                for src in &pair.sources {
                    let _ = writeln!(out, "Source: {}", src.display());
                }
                for trg in &pair.targets {
                    let _ = writeln!(out, "Target: {}", trg.display());
                }
            }
        }
        out
    }
}

impl fmt::Display for VerseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<VerseData: {}>", self.verse)
    }
}
