use std::fs::{self, File};
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use log::{debug, info};
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::config::CorpusConfig;
use crate::error::{Result, SourceError};
use crate::record::Record;
use crate::shuffle::ShuffleBuffer;
use crate::CorpusSource;

/// Streams records from one or more JSONL shard files.
///
/// Each non-blank line is one JSON object. Nothing is read until a batch is
/// requested, and at most one line per shard plus the shuffle buffer is held
/// in memory. Passes restart by reopening the shards.
///
/// Once [`shuffle`](CorpusSource::shuffle) has been called, every following
/// pass visits the shards in a per-epoch random order and routes records
/// through a [`ShuffleBuffer`] of `shuffle_buffer` entries.
pub struct JsonlSource {
    shards: Vec<PathBuf>,
    config: CorpusConfig,
    shuffled: bool,
    epoch: u64,
    reader: ShardReader,
    buffer: Option<ShuffleBuffer<Record>>,
}

impl JsonlSource {
    /// `path` is a single `.jsonl` file or a directory of `.jsonl`/`.json` shards.
    pub fn open<P: AsRef<Path>>(path: P, config: CorpusConfig) -> Result<Self> {
        config.validate()?;
        let shards = collect_shards(path.as_ref())?;
        info!("found {} shard(s) under {}", shards.len(), path.as_ref().display());
        Ok(Self {
            reader: ShardReader::new(shards.clone()),
            shards,
            config,
            shuffled: false,
            epoch: 0,
            buffer: None,
        })
    }

    pub fn shards(&self) -> &[PathBuf] {
        &self.shards
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        let Some(buffer) = self.buffer.as_mut() else {
            return self.reader.next_record();
        };
        while !buffer.is_full() {
            match self.reader.next_record()? {
                Some(record) => buffer.push(record),
                None => break,
            }
        }
        Ok(buffer.pop())
    }
}

impl CorpusSource for JsonlSource {
    fn shuffle(&mut self) {
        self.shuffled = true;
    }

    fn start_pass(&mut self) -> Result<()> {
        let mut order = self.shards.clone();
        self.buffer = if self.shuffled {
            let mut rng = self.config.epoch_rng(self.epoch);
            order.shuffle(&mut rng);
            debug!("epoch {} shard order: {:?}", self.epoch, order);
            Some(ShuffleBuffer::new(self.config.shuffle_buffer, rng))
        } else {
            None
        };
        self.epoch += 1;
        self.reader = ShardReader::new(order);
        Ok(())
    }

    fn next_batch(&mut self) -> Result<Option<Vec<Record>>> {
        let mut batch = Vec::with_capacity(self.config.batch_size);
        while batch.len() < self.config.batch_size {
            match self.next_record()? {
                Some(record) => batch.push(record),
                None => break,
            }
        }
        Ok(if batch.is_empty() { None } else { Some(batch) })
    }
}

/// Walks the shards in order, one line at a time.
struct ShardReader {
    shards: Vec<PathBuf>,
    next_shard: usize,
    current: Option<OpenShard>,
}

struct OpenShard {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl ShardReader {
    fn new(shards: Vec<PathBuf>) -> Self {
        Self {
            shards,
            next_shard: 0,
            current: None,
        }
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if self.current.is_none() {
                let Some(path) = self.shards.get(self.next_shard).cloned() else {
                    return Ok(None);
                };
                self.next_shard += 1;
                let file = File::open(&path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?;
                debug!("streaming shard {}", path.display());
                self.current = Some(OpenShard {
                    path,
                    lines: BufReader::new(file).lines(),
                    line: 0,
                });
            }

            let Some(shard) = self.current.as_mut() else {
                continue;
            };
            match shard.lines.next() {
                None => self.current = None,
                Some(Err(source)) => {
                    return Err(SourceError::Io {
                        path: shard.path.clone(),
                        source,
                    })
                }
                Some(Ok(line)) => {
                    shard.line += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    return parse_record(&line, &shard.path, shard.line).map(Some);
                }
            }
        }
    }
}

fn parse_record(line: &str, path: &Path, line_no: usize) -> Result<Record> {
    let value: Value = serde_json::from_str(line).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        line: line_no,
        source,
    })?;
    match value {
        Value::Object(fields) => Ok(Record::new(fields)),
        _ => Err(SourceError::NotAnObject {
            path: path.to_path_buf(),
            line: line_no,
        }),
    }
}

fn collect_shards(path: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if fs::metadata(path).map_err(io_err)?.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut shards = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err)? {
        let p = entry.map_err(io_err)?.path();
        let is_shard = p
            .extension()
            .map(|ext| ext == "jsonl" || ext == "json")
            .unwrap_or(false);
        if p.is_file() && is_shard {
            shards.push(p);
        }
    }
    if shards.is_empty() {
        return Err(SourceError::NoShards(path.to_path_buf()));
    }
    shards.sort();
    Ok(shards)
}
