use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load tokenizer from {path}: {message}")]
    Load { path: String, message: String },

    #[error("failed to encode text: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, TokenizerError>;
