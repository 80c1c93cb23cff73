//! `lexsync compile` – build a binary dictionary shard from plain text.
//!
//! Input format: one entry per line, `word [nature] [frequency]`,
//! whitespace-separated; `#` starts a comment line.

use anyhow::{Context, Result};
use lexsync_core::artifacts::dict::{encode_shard, DictAttribute, DictEntry};
use std::fs;
use std::path::Path;

pub fn run_compile(input: &Path, output: &Path) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("cannot read dictionary source {}", input.display()))?;

    let mut entries = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let word = match parts.next() {
            Some(w) => w.to_string(),
            None => continue,
        };
        let nature = parts.next().unwrap_or("n").to_string();
        let frequency: u32 = match parts.next() {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("bad frequency on line {}", lineno + 1))?,
            None => 1,
        };
        entries.push(DictEntry {
            word,
            attribute: DictAttribute {
                total_frequency: frequency,
                natures: vec![(nature, frequency)],
            },
        });
    }

    let bytes = encode_shard(&entries)?;
    fs::write(output, bytes)
        .with_context(|| format!("cannot write shard {}", output.display()))?;
    println!("compiled {} entries to {}", entries.len(), output.display());
    Ok(())
}
