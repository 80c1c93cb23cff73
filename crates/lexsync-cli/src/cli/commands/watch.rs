//! `lexsync watch` – background model load with status polling.

use anyhow::Result;
use lexsync_core::analyzer::LexicalAnalyzer;
use lexsync_core::config::SyncConfig;
use std::time::{Duration, Instant};

pub fn run_watch(
    cfg: &SyncConfig,
    cws: &str,
    pos: Option<&str>,
    ner: Option<&str>,
    timeout_secs: u64,
    text: &[String],
) -> Result<()> {
    let analyzer = LexicalAnalyzer::new(cfg);
    analyzer.lazy(cws, pos, ner)?;
    println!("loading models in the background (status {})", analyzer.status().code());

    let deadline = Instant::now() + Duration::from_secs(timeout_secs);
    while !analyzer.is_ready() {
        if Instant::now() >= deadline {
            anyhow::bail!(
                "models not ready after {}s (status {}); check the log",
                timeout_secs,
                analyzer.status().code()
            );
        }
        std::thread::sleep(Duration::from_millis(200));
    }
    println!("models ready");

    for line in text {
        let terms: Vec<String> = analyzer
            .analyze(line)
            .into_iter()
            .map(|t| t.to_string())
            .collect();
        println!("{}", terms.join(" "));
    }
    Ok(())
}
