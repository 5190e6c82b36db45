use thiserror::Error;

/// Errors raised while building a single token or identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenError {
    #[error("'{0}' does not look like a valid BCVWP identifier")]
    InvalidIdentifier(String),
    #[error("'{0}' is not an 8-digit BBCCCVVV verse reference")]
    InvalidVerseRef(String),
    #[error("invalid Strong's code: {0}")]
    InvalidStrongs(String),
}

/// Errors raised while loading or querying a token inventory.
///
/// Load failures are fatal for the whole inventory: downstream referential
/// checks are only meaningful against a complete token set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InventoryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{label}: missing ID header '{header}'")]
    MissingIdColumn { label: String, header: String },
    #[error("{label}, line {line}: {source}")]
    InvalidRow {
        label: String,
        line: usize,
        #[source]
        source: TokenError,
    },
    #[error("{label} is empty: no header row")]
    EmptyFile { label: String },
    #[error("unknown token attribute '{0}'")]
    UnknownAttribute(String),
}
