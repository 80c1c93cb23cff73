//! `lexsync analyze` – load models synchronously and analyze text.

use anyhow::Result;
use lexsync_core::analyzer::LexicalAnalyzer;
use lexsync_core::config::SyncConfig;

pub fn run_analyze(
    cfg: &SyncConfig,
    cws: &str,
    pos: Option<&str>,
    ner: Option<&str>,
    text: &[String],
) -> Result<()> {
    let analyzer = LexicalAnalyzer::new(cfg);
    let ok = analyzer.reload(cws, pos, ner)?;
    if !ok {
        anyhow::bail!("model reload failed; see the log for per-artifact errors");
    }

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
