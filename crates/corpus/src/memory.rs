use log::debug;
use rand::seq::SliceRandom;

use crate::config::CorpusConfig;
use crate::error::Result;
use crate::record::Record;
use crate::CorpusSource;

/// Records held in memory. Always restartable.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    records: Vec<Record>,
    order: Vec<usize>,
    cursor: usize,
    config: CorpusConfig,
    epoch: u64,
}

impl InMemorySource {
    pub fn new(records: Vec<Record>, config: CorpusConfig) -> Result<Self> {
        config.validate()?;
        let order = (0..records.len()).collect();
        Ok(Self {
            records,
            order,
            cursor: 0,
            config,
            epoch: 0,
        })
    }

    pub fn from_texts<I, S>(texts: I, config: CorpusConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(Record::from_content).collect(), config)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CorpusSource for InMemorySource {
    fn shuffle(&mut self) {
        let mut rng = self.config.epoch_rng(self.epoch);
        self.order.shuffle(&mut rng);
        debug!("shuffled {} in-memory records (epoch {})", self.records.len(), self.epoch);
        self.epoch += 1;
    }

    fn start_pass(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
        if self.cursor >= self.order.len() {
            return Ok(None);
        }
        let end = (self.cursor + self.config.batch_size).min(self.order.len());
        let batch = self.order[self.cursor..end]
            .iter()
            .map(|&i| self.records[i].clone())
            .collect();
        self.cursor = end;
        Ok(Some(batch))
    }
}
