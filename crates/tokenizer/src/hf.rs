use std::path::Path;

use log::debug;

use crate::error::{Result, TokenizerError};
use crate::Tokenizer;

/// A Hugging Face `tokenizer.json` tokenizer (byte-level BPE, WordPiece, ...).
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
    add_special_tokens: bool,
    parallel: bool,
}

impl std::fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("vocab_size", &self.vocab_size())
            .field("add_special_tokens", &self.add_special_tokens)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl HfTokenizer {
    pub fn new(inner: tokenizers::Tokenizer) -> Self {
        Self {
            inner,
            add_special_tokens: true,
            parallel: false,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| TokenizerError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!(
            "loaded tokenizer from {} (vocab size {})",
            path.display(),
            inner.get_vocab_size(true)
        );
        Ok(Self::new(inner))
    }

    /// Whether the post-processor may insert special tokens (BOS/EOS).
    pub fn with_special_tokens(mut self, add: bool) -> Self {
        self.add_special_tokens = add;
        self
    }

    /// Let the library encode a batch on its own thread pool.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Tokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, self.add_special_tokens)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        if !self.parallel {
            return texts.iter().map(|text| self.encode(text)).collect();
        }
        let encodings = self
            .inner
            .encode_batch(texts.to_vec(), self.add_special_tokens)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encodings.iter().map(|e| e.get_ids().to_vec()).collect())
    }

    // Counts added tokens too, so every id the tokenizer can emit is in range.
    fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokenizers::models::wordlevel::WordLevel;

    fn word_level() -> HfTokenizer {
        let vocab: HashMap<String, u32> = [("<unk>", 0), ("fn", 1), ("main", 2), ("impl", 3)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        let model = WordLevel::builder()
            .vocab(vocab)
            .unk_token("<unk>".to_string())
            .build()
            .unwrap();
        HfTokenizer::new(tokenizers::Tokenizer::new(model))
    }

    #[test]
    fn encodes_through_the_wrapped_model() {
        // No pre-tokenizer: the whole input is one word.
        let tok = word_level();
        assert_eq!(tok.encode("main").unwrap(), vec![2]);
        assert_eq!(tok.encode("fn main").unwrap(), vec![0]);
        assert_eq!(tok.vocab_size(), 4);
    }

    #[test]
    fn parallel_and_sequential_batches_agree() {
        let texts = ["fn", "impl", "main"];
        let sequential = word_level().encode_batch(&texts).unwrap();
        let parallel = word_level().with_parallelism(true).encode_batch(&texts).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential, vec![vec![1], vec![3], vec![2]]);
    }

    // WordLevel over whitespace words, with a `<s>` prefix added by the post-processor.
    const WITH_BOS: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": {
            "type": "TemplateProcessing",
            "single": [
                {"SpecialToken": {"id": "<s>", "type_id": 0}},
                {"Sequence": {"id": "A", "type_id": 0}}
            ],
            "pair": [
                {"Sequence": {"id": "A", "type_id": 0}},
                {"Sequence": {"id": "B", "type_id": 1}}
            ],
            "special_tokens": {
                "<s>": {"id": "<s>", "ids": [4], "tokens": ["<s>"]}
            }
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"<unk>": 0, "fn": 1, "main": 2, "impl": 3, "<s>": 4},
            "unk_token": "<unk>"
        }
    }"#;

    #[test]
    fn special_tokens_can_be_switched_off() {
        let inner: tokenizers::Tokenizer = WITH_BOS.parse().unwrap();
        let tok = HfTokenizer::new(inner.clone());
        assert_eq!(tok.encode("fn main").unwrap(), vec![4, 1, 2]);

        let plain = HfTokenizer::new(inner).with_special_tokens(false);
        assert_eq!(plain.encode("fn main").unwrap(), vec![1, 2]);
        assert_eq!(plain.encode_batch(&["impl fn"]).unwrap(), vec![vec![3, 1]]);
    }

    #[test]
    fn loads_a_saved_tokenizer_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tokenizer.json");
        word_level().inner.save(&path, false).unwrap();

        let loaded = HfTokenizer::from_file(&path).unwrap();
        assert_eq!(loaded.encode("impl").unwrap(), vec![3]);
        assert_eq!(loaded.vocab_size(), 4);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = HfTokenizer::from_file("/definitely/not/here/tokenizer.json").unwrap_err();
        assert!(matches!(err, TokenizerError::Load { .. }));
    }
}
