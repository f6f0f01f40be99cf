use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use corpus::{CorpusConfig, JsonlSource};
use packer::{PackerConfig, WindowedPacker};
use tokenizer::{ByteTokenizer, HfTokenizer, Tokenizer};

/// Stream a JSONL corpus through a tokenizer and pack it into training windows.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSONL file or directory of JSONL shards
    #[arg(short, long)]
    corpus: PathBuf,

    /// YAML config with `packer` and `corpus` sections
    #[arg(long, default_value = "configs/pack_config.yaml")]
    config: PathBuf,

    /// Hugging Face tokenizer.json (bytes are used as ids when omitted)
    #[arg(short, long)]
    tokenizer: Option<PathBuf>,

    /// Override `packer.block_size`
    #[arg(short, long)]
    block_size: Option<i64>,

    /// Passes over the corpus
    #[arg(long, default_value_t = 1)]
    passes: usize,

    /// Stop each pass after this many pairs
    #[arg(long)]
    max_pairs: Option<NonZeroUsize>,

    /// Let the tokenizer encode each batch on its own thread pool
    #[arg(long)]
    parallel: bool,

    /// Do not let the tokenizer insert BOS/EOS-style special tokens
    #[arg(long)]
    no_special_tokens: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppConfig {
    packer: PackerConfig,
    corpus: CorpusConfig,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config: AppConfig = if cli.config.exists() {
        let content = fs::read_to_string(&cli.config)
            .with_context(|| format!("failed to read {}", cli.config.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(block_size) = cli.block_size {
        config.packer.block_size = block_size;
    }
    Ok(config)
}

fn load_tokenizer(cli: &Cli) -> Result<Box<dyn Tokenizer>> {
    let tokenizer: Box<dyn Tokenizer> = match &cli.tokenizer {
        Some(path) => Box::new(
            HfTokenizer::from_file(path)
                .context("Failed to load tokenizer")?
                .with_special_tokens(!cli.no_special_tokens)
                .with_parallelism(cli.parallel),
        ),
        None => Box::new(ByteTokenizer::new()),
    };
    Ok(tokenizer)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let tokenizer = load_tokenizer(&cli)?;
    let source = JsonlSource::open(&cli.corpus, config.corpus.clone())
        .with_context(|| format!("Failed to open corpus {}", cli.corpus.display()))?;

    let mut packer = WindowedPacker::new(&config.packer, tokenizer, source)?;
    println!(
        "Packing {:?} into blocks of {} tokens (vocab size {})",
        cli.corpus,
        packer.block_size(),
        packer.vocab_size()
    );

    for pass in 0..cli.passes {
        let mut pairs = packer.iterate();
        let mut yielded = 0usize;
        while cli.max_pairs.map_or(true, |max| yielded < max.get()) {
            let Some(pair) = pairs.next() else {
                break;
            };
            pair.with_context(|| format!("pass {} failed after {} pairs", pass, yielded))?;
            yielded += 1;
        }
        let stats = serde_json::to_string(pairs.stats())?;
        println!("Pass {} | pairs {} | {}", pass, yielded, stats);
    }

    Ok(())
}
