use corpus::{CorpusSource, SourceError};
use log::{debug, info};
use serde::Serialize;
use tokenizer::Tokenizer;

use crate::error::Result;
use crate::window::{window_count, TrainingPair};
use crate::PackerConfig;

/// Streams a corpus through a tokenizer and packs the ids into
/// shift-aligned training pairs of `block_size` tokens.
///
/// Each processing batch handed out by the source is tokenized record by
/// record, concatenated in arrival order, and cut into windows of
/// `block_size + 1` tokens. The tail of a batch that does not fill a whole
/// window is dropped; nothing is carried into the next batch and nothing is
/// ever padded.
pub struct WindowedPacker<T, S> {
    tokenizer: T,
    source: S,
    block_size: usize,
}

impl<T: Tokenizer, S: CorpusSource> WindowedPacker<T, S> {
    pub fn new(config: &PackerConfig, tokenizer: T, source: S) -> Result<Self> {
        let block_size = config.validated_block_size()?;
        Ok(Self {
            tokenizer,
            source,
            block_size,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn vocab_size(&self) -> usize {
        self.tokenizer.vocab_size()
    }

    /// Start a new pass over the corpus.
    ///
    /// The source is asked to shuffle and rewind when the first pair is
    /// requested. The pass ends when the source runs dry, or right after
    /// the first error has been yielded.
    pub fn iterate(&mut self) -> Pairs<'_, T, S> {
        Pairs {
            packer: self,
            state: PassState::NotStarted,
            buffer: Vec::new(),
            cursor: 0,
            stats: PassStats::default(),
        }
    }

    fn window_len(&self) -> usize {
        self.block_size + 1
    }
}

impl<'a, T: Tokenizer, S: CorpusSource> IntoIterator for &'a mut WindowedPacker<T, S> {
    type Item = Result<TrainingPair>;
    type IntoIter = Pairs<'a, T, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iterate()
    }
}

/// Counters for one pass, updated as each batch is packed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub batches: usize,
    pub records: usize,
    pub tokens: usize,
    pub windows: usize,
    pub dropped_tokens: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassState {
    NotStarted,
    Running,
    Done,
}

/// Lazy iterator over the training pairs of one pass.
pub struct Pairs<'a, T, S> {
    packer: &'a mut WindowedPacker<T, S>,
    state: PassState,
    buffer: Vec<u32>,
    cursor: usize,
    stats: PassStats,
}

impl<T: Tokenizer, S: CorpusSource> Pairs<'_, T, S> {
    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    fn begin(&mut self) -> Result<()> {
        self.packer.source.shuffle();
        self.packer.source.start_pass()?;
        info!("starting pass (block size {})", self.packer.block_size);
        Ok(())
    }

    /// Tokenize the next batch into the concatenation buffer.
    /// Returns false once the source has no more batches.
    fn fill(&mut self) -> Result<bool> {
        let Some(records) = self.packer.source.next_batch()? else {
            return Ok(false);
        };
        let texts = records
            .iter()
            .map(|record| record.content())
            .collect::<std::result::Result<Vec<&str>, SourceError>>()?;
        let encoded = self.packer.tokenizer.encode_batch(&texts)?;

        self.buffer.clear();
        for ids in &encoded {
            self.buffer.extend_from_slice(ids);
        }
        self.cursor = 0;

        let windows = window_count(self.buffer.len(), self.packer.block_size);
        let dropped = self.buffer.len() - windows * self.packer.window_len();
        self.stats.batches += 1;
        self.stats.records += records.len();
        self.stats.tokens += self.buffer.len();
        self.stats.windows += windows;
        self.stats.dropped_tokens += dropped;
        debug!(
            "batch {}: {} records, {} tokens, {} windows, {} dropped",
            self.stats.batches,
            records.len(),
            self.buffer.len(),
            windows,
            dropped
        );
        Ok(true)
    }

    fn next_window(&mut self) -> Option<TrainingPair> {
        let end = self.cursor + self.packer.window_len();
        if end > self.buffer.len() {
            return None;
        }
        let pair = TrainingPair::from_window(&self.buffer[self.cursor..end]);
        self.cursor = end;
        Some(pair)
    }

    fn finish(&mut self) {
        self.state = PassState::Done;
        self.buffer = Vec::new();
    }
}

impl<T: Tokenizer, S: CorpusSource> Iterator for Pairs<'_, T, S> {
    type Item = Result<TrainingPair>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                PassState::Done => return None,
                PassState::NotStarted => {
                    self.state = PassState::Running;
                    if let Err(e) = self.begin() {
                        self.finish();
                        return Some(Err(e));
                    }
                }
                PassState::Running => {
                    if let Some(pair) = self.next_window() {
                        return Some(Ok(pair));
                    }
                    match self.fill() {
                        Ok(true) => {}
                        Ok(false) => {
                            info!(
                                "pass finished: {} batches, {} records, {} tokens, {} windows, {} tokens dropped",
                                self.stats.batches,
                                self.stats.records,
                                self.stats.tokens,
                                self.stats.windows,
                                self.stats.dropped_tokens
                            );
                            self.finish();
                            return None;
                        }
                        Err(e) => {
                            self.finish();
                            return Some(Err(e));
                        }
                    }
                }
            }
        }
    }
}
