use log::warn;

use crate::error::Result;
use crate::record::Record;
use crate::CorpusSource;

/// Batches an arbitrary lazy record stream.
///
/// The stream can only be walked once: it cannot be reordered, and any pass
/// after the first is empty.
pub struct IterSource<I> {
    records: Option<I>,
    batch_size: usize,
    passes: usize,
    refused_restarts: usize,
}

impl<I> IterSource<I>
where
    I: Iterator<Item = Result<Record>>,
{
    pub fn new<T>(records: T, batch_size: usize) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            records: Some(records.into_iter()),
            batch_size: batch_size.max(1),
            passes: 0,
            refused_restarts: 0,
        }
    }
}

impl<I> CorpusSource for IterSource<I>
where
    I: Iterator<Item = Result<Record>>,
{
    fn shuffle(&mut self) {}

    fn start_pass(&mut self) -> Result<()> {
        self.passes += 1;
        if self.passes > 1 {
            self.records = None;
            self.refused_restarts += 1;
            warn!("record stream cannot be restarted; pass {} is empty", self.passes);
        }
        Ok(())
    }

    fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
        let Some(records) = self.records.as_mut() else {
            return Ok(None);
        };
        let mut batch = Vec::with_capacity(self.batch_size);
        for record in records.by_ref().take(self.batch_size) {
            batch.push(record?);
        }
        if batch.is_empty() {
            self.records = None;
            return Ok(None);
        }
        Ok(Some(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;

    fn ok(text: &str) -> Result<Record> {
        Ok(Record::from_content(text))
    }

    #[test]
    fn batches_lazily_and_only_once() {
        let mut source = IterSource::new(vec![ok("a"), ok("b"), ok("c")], 2);
        source.start_pass().unwrap();
        assert_eq!(source.next_batch().unwrap().unwrap().len(), 2);
        assert_eq!(source.next_batch().unwrap().unwrap().len(), 1);
        assert!(source.next_batch().unwrap().is_none());
        assert_eq!(source.refused_restarts, 0);

        source.start_pass().unwrap();
        assert_eq!(source.refused_restarts, 1);
        assert!(source.next_batch().unwrap().is_none());
    }

    #[test]
    fn abandoned_first_pass_is_not_resumed() {
        let mut source = IterSource::new(vec![ok("a"), ok("b"), ok("c")], 1);
        source.start_pass().unwrap();
        assert_eq!(source.next_batch().unwrap().unwrap().len(), 1);

        source.start_pass().unwrap();
        assert_eq!(source.refused_restarts, 1);
        assert!(source.next_batch().unwrap().is_none());
    }

    #[test]
    fn upstream_errors_surface_in_the_batch() {
        let failing: Result<Record> = Err(SourceError::MissingField("content".to_string()));
        let mut source = IterSource::new(vec![ok("a"), failing, ok("c")], 8);
        source.start_pass().unwrap();
        assert!(source.next_batch().is_err());
    }
}
