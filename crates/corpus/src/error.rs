use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: invalid JSON record: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}:{line}: record is not a JSON object")]
    NotAnObject { path: PathBuf, line: usize },

    #[error("record has no `{0}` field")]
    MissingField(String),

    #[error("record field `{0}` is not a string")]
    NotText(String),

    #[error("no .jsonl shards found under {0}")]
    NoShards(PathBuf),

    #[error("invalid corpus configuration: {0}")]
    InvalidConfig(String),

    #[error("corpus stream failed: {0}")]
    Stream(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SourceError>;
