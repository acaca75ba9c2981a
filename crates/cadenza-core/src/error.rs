use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("catalog is missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("invalid feature schema: {0}")]
    InvalidSchema(String),

    #[error("track {position} has {found} features, schema expects {expected}")]
    SchemaMismatch {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("feature '{0}' is not part of the catalog schema")]
    UnknownFeature(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
