use corpus::SourceError;
use thiserror::Error;
use tokenizer::TokenizerError;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("invalid packer configuration: {0}")]
    Configuration(String),

    #[error("corpus source failed: {0}")]
    Source(#[from] SourceError),

    #[error("tokenization failed: {0}")]
    Tokenization(#[from] TokenizerError),
}

pub type Result<T> = std::result::Result<T, PackError>;
