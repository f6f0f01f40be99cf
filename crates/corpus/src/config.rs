use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Records handed to the packer per processing batch.
    pub batch_size: usize,
    /// Records held back for randomized emission once shuffling is on.
    pub shuffle_buffer: usize,
    /// Base seed; each pass mixes in its epoch. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            shuffle_buffer: 1000,
            seed: None,
        }
    }
}

impl CorpusConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SourceError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn epoch_rng(&self, epoch: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(epoch)),
            None => StdRng::from_entropy(),
        }
    }
}
