use thiserror::Error;

/// Errors raised while building or reading alignment data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BurritoError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: invalid alignment JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} should contain an object, not a list: not converted to Burrito format yet?")]
    NotBurritoFormat { path: String },
    #[error("unexpected alignment type '{found}', expected '{expected}'")]
    TypeMismatch { expected: String, found: String },
    #[error("{path} contains no alignment records")]
    EmptyGroup { path: String },
    #[error("references have roles {found:?}, type '{kind}' requires {expected:?}")]
    RoleMismatch {
        kind: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("'{role}' is not a role of type '{kind}'")]
    UnknownRole { role: String, kind: String },
    #[error("invalid reader configuration: {0}")]
    InvalidConfig(String),
}
