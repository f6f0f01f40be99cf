use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use log::warn;
use serde_json::Value;

/// Split one JSONL corpus into numbered shards for streaming.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long)]
    output_dir: PathBuf,
    #[arg(short, long, default_value_t = 1000)]
    lines_per_shard: usize,
    /// Drop records without a string field of this name
    #[arg(long, default_value = "content")]
    text_field: String,
}

fn keep(line: &str, text_field: &str) -> bool {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(fields)) => matches!(fields.get(text_field), Some(Value::String(_))),
        _ => false,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.lines_per_shard == 0 {
        bail!("--lines-per-shard must be at least 1");
    }

    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;

    let file = File::open(&cli.input).with_context(|| format!("failed to open {}", cli.input.display()))?;
    let reader = BufReader::new(file);

    let mut shard_idx = 0;
    let mut record_count = 0;
    let mut skipped = 0;
    let mut writer: Option<BufWriter<File>> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if !keep(&line, &cli.text_field) {
            warn!("line {}: not a record with a `{}` string, skipping", line_no + 1, cli.text_field);
            skipped += 1;
            continue;
        }

        if record_count % cli.lines_per_shard == 0 {
            if let Some(mut w) = writer.take() {
                w.flush()?;
            }
            let shard_path = cli.output_dir.join(format!("shard_{:04}.jsonl", shard_idx));
            println!("Creating shard: {:?}", shard_path);
            writer = Some(BufWriter::new(File::create(shard_path)?));
            shard_idx += 1;
        }

        if let Some(ref mut w) = writer {
            writeln!(w, "{}", line)?;
        }
        record_count += 1;
    }
    if let Some(mut w) = writer {
        w.flush()?;
    }

    println!(
        "Done. Created {} shards from {} records ({} skipped).",
        shard_idx, record_count, skipped
    );
    Ok(())
}
