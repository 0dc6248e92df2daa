use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollupError {
    #[error("Cannot redistribute a total across zero period fields")]
    InvalidArity,

    #[error("Edit not allowed on '{target}' field '{field}': {reason}")]
    EditNotAllowed {
        target: String,
        field: String,
        reason: String,
    },

    #[error("No record named '{0}'")]
    UnknownRecord(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Record name '{name}' matches {matches} nodes; supply an explicit path")]
    AmbiguousTarget { name: String, matches: usize },

    #[error("Duplicate record: {0}")]
    DuplicateRecord(String),

    #[error("Invalid path for record '{0}': path must not be empty")]
    InvalidPath(String),

    #[error("Record '{record}' has a path ending in '{label}' instead of its own name")]
    PathNameMismatch { record: String, label: String },

    #[error("Record '{record}' references missing parent '{parent}'")]
    MissingParent { record: String, parent: String },

    #[error("Invalid period range: {0}")]
    InvalidPeriodRange(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RollupError {
    pub(crate) fn not_allowed(target: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::EditNotAllowed {
            target: target.to_string(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RollupError>;
