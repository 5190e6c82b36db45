use thiserror::Error;

/// Errors raised while aggregating records by verse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AggregateError {
    /// Raised only under [`SelectorPolicy::Fail`](crate::SelectorPolicy::Fail).
    #[error("verse {verse}, record {record}: {role} selector '{selector}' does not resolve to a token of the verse")]
    UnresolvedSelector {
        verse: String,
        record: String,
        role: &'static str,
        selector: String,
    },
}
