use std::fmt;

use burrito::AlignmentRecord;
use serde::{Deserialize, Serialize};

/// Why an alignment record was rejected. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Reason {
    EmptySource,
    EmptyTarget,
    MissingSource,
    MissingTargetSome,
    MissingTargetAll,
    NoSource,
    NoTarget,
    Unknown,
}

impl Reason {
    pub const ALL: [Reason; 8] = [
        Reason::EmptySource,
        Reason::EmptyTarget,
        Reason::MissingSource,
        Reason::MissingTargetSome,
        Reason::MissingTargetAll,
        Reason::NoSource,
        Reason::NoTarget,
        Reason::Unknown,
    ];

    /// Stable upper-case name, e.g. `MISSINGTARGETSOME`.
    pub fn name(&self) -> &'static str {
        match self {
            Reason::EmptySource => "EMPTYSOURCE",
            Reason::EmptyTarget => "EMPTYTARGET",
            Reason::MissingSource => "MISSINGSOURCE",
            Reason::MissingTargetSome => "MISSINGTARGETSOME",
            Reason::MissingTargetAll => "MISSINGTARGETALL",
            Reason::NoSource => "NOSOURCE",
            Reason::NoTarget => "NOTARGET",
            Reason::Unknown => "UNKNOWN",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Reason::EmptySource => "Empty string in source selectors",
            Reason::EmptyTarget => "Empty string in target selectors",
            Reason::MissingSource => "Token reference is missing from the source inventory",
            Reason::MissingTargetSome => "Some token references are missing from the target inventory",
            Reason::MissingTargetAll => "All token references are missing from the target inventory",
            Reason::NoSource => "No source selectors",
            Reason::NoTarget => "No target selectors",
            Reason::Unknown => "Uncategorized error",
        }
    }

    /// True for the reasons that carry the list of missing ids.
    pub fn reports_missing(&self) -> bool {
        matches!(
            self,
            Reason::MissingSource | Reason::MissingTargetSome | Reason::MissingTargetAll
        )
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of classifying one invalid record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub reason: Reason,
    /// Selectors absent from the inventory, for the `MISSING*` reasons.
    pub missing: Vec<String>,
}

impl Finding {
    pub fn new(reason: Reason) -> Self {
        Self {
            reason,
            missing: Vec::new(),
        }
    }

    pub fn with_missing(reason: Reason, missing: Vec<String>) -> Self {
        Self { reason, missing }
    }
}

/// A rejected record kept for auditing.
#[derive(Debug, Clone)]
pub struct BadRecord {
    pub identifier: String,
    pub record: AlignmentRecord,
    pub reason: Reason,
    /// Missing selector ids, if any.
    pub data: Vec<String>,
}

impl BadRecord {
    pub fn new(record: AlignmentRecord, finding: Finding) -> Self {
        Self {
            identifier: record.identifier().to_string(),
            record,
            reason: finding.reason,
            data: finding.missing,
        }
    }

    /// One-line audit rendering.
    pub fn display(&self) -> String {
        let sources = self.record.source_selectors();
        let targets = self.record.target_selectors();
        match self.reason {
            Reason::MissingTargetSome | Reason::MissingTargetAll => format!(
                "{}: {}. Sources: {:?}, Missing targets: {:?}",
                self.identifier, self.reason, sources, self.data
            ),
            Reason::MissingSource => format!(
                "{}: {}. Missing sources: {:?}, targets: {:?}",
                self.identifier, self.reason, self.data, targets
            ),
            _ => format!(
                "{}: {}. Sources: {:?}, targets: {:?}",
                self.identifier, self.reason, sources, targets
            ),
        }
    }
}

impl fmt::Display for BadRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<BadRecord ({}): '{}'", self.identifier, self.reason.message())?;
        if !self.data.is_empty() {
            write!(f, ", {:?}", self.data)?;
        }
        f.write_str(">")
    }
}
