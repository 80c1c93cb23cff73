//! `lexsync segment` – load a custom dictionary and segment text.

use anyhow::Result;
use lexsync_core::config::SyncConfig;
use lexsync_core::dict_segmenter::DictSegmenter;

pub fn run_segment(cfg: &SyncConfig, dict: &str, text: &[String]) -> Result<()> {
    let segmenter = DictSegmenter::new(cfg);
    let ok = segmenter.reload(dict)?;
    if !ok {
        anyhow::bail!("dictionary reload failed; see the log for per-shard errors");
    }
    tracing::info!(
        "loaded dictionary shards: {}",
        segmenter.short_custom_paths().join(", ")
    );

    for line in text {
        let terms: Vec<String> = segmenter
            .seg(line)
            .into_iter()
            .map(|t| t.to_string())
            .collect();
        println!("{}", terms.join(" "));
    }
    Ok(())
}
