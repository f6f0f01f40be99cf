//! Text-to-id capability consumed by the packer.
//!
//! The packer only needs two things from a tokenizer: ids for a piece of text
//! and the size of the id space. Everything else (merges, vocab files,
//! normalization) stays behind the implementation.

pub mod byte;
pub mod error;
pub mod hf;

pub use byte::ByteTokenizer;
pub use error::TokenizerError;
pub use hf::HfTokenizer;

use error::Result;

pub trait Tokenizer {
    /// Encode one text into vocabulary ids.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Encode several texts, one id sequence per input, in input order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// Number of distinct ids this tokenizer can produce.
    fn vocab_size(&self) -> usize;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        (**self).encode_batch(texts)
    }

    fn vocab_size(&self) -> usize {
        (**self).vocab_size()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        (**self).encode(text)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        (**self).encode_batch(texts)
    }

    fn vocab_size(&self) -> usize {
        (**self).vocab_size()
    }
}
