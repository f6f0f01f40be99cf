use crate::error::Result;
use crate::Tokenizer;

/// Maps every UTF-8 byte to its own id. Needs no vocabulary file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteTokenizer;

impl ByteTokenizer {
    pub const VOCAB_SIZE: usize = 256;

    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for ByteTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.bytes().map(u32::from).collect())
    }

    fn vocab_size(&self) -> usize {
        Self::VOCAB_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_one_id_per_byte() {
        let ids = ByteTokenizer.encode("hé").unwrap();
        assert_eq!(ids, vec![0x68, 0xC3, 0xA9]);
    }

    #[test]
    fn empty_text_is_empty_sequence() {
        assert!(ByteTokenizer.encode("").unwrap().is_empty());
    }

    #[test]
    fn batch_keeps_input_order() {
        let ids = ByteTokenizer.encode_batch(&["b", "", "a"]).unwrap();
        assert_eq!(ids, vec![vec![98], vec![], vec![97]]);
        assert_eq!(ByteTokenizer.vocab_size(), 256);
    }
}
