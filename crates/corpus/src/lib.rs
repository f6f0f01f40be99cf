//! Record sources for the packer.
//!
//! A [`CorpusSource`] hands out records in processing batches, one pass at a
//! time. Where the records come from (memory, JSONL shards on disk, some
//! upstream iterator) and how they are reordered is entirely the source's
//! business; the packer only asks for a shuffle before each pass.

pub mod config;
pub mod error;
pub mod iter;
pub mod jsonl;
pub mod memory;
pub mod record;
pub mod shuffle;

pub use config::CorpusConfig;
pub use error::SourceError;
pub use iter::IterSource;
pub use jsonl::JsonlSource;
pub use memory::InMemorySource;
pub use record::Record;
pub use shuffle::ShuffleBuffer;

use error::Result;

pub trait CorpusSource {
    /// Randomize the order of the passes that follow.
    fn shuffle(&mut self);

    /// Rewind to the beginning of the corpus.
    fn start_pass(&mut self) -> Result<()>;

    /// Next processing batch of the current pass, `None` once it is over.
    /// Batches are never empty.
    fn next_batch(&mut self) -> Result<Option<Vec<Record>>>;
}

impl<S: CorpusSource + ?Sized> CorpusSource for &mut S {
    fn shuffle(&mut self) {
        (**self).shuffle()
    }

    fn start_pass(&mut self) -> Result<()> {
        (**self).start_pass()
    }

    fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
        (**self).next_batch()
    }
}

impl<S: CorpusSource + ?Sized> CorpusSource for Box<S> {
    fn shuffle(&mut self) {
        (**self).shuffle()
    }

    fn start_pass(&mut self) -> Result<()> {
        (**self).start_pass()
    }

    fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
        (**self).next_batch()
    }
}
