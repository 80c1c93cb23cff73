//! CLI for the lexsync model loader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lexsync_core::config;
use std::path::Path;

use commands::{run_analyze, run_compile, run_schemes, run_segment, run_watch};

/// Top-level CLI for lexsync.
#[derive(Debug, Parser)]
#[command(name = "lexsync")]
#[command(about = "lexsync: hot-reloadable language-analysis models", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Load analysis models synchronously and analyze the given text.
    Analyze {
        /// Segmentation model path (local path or http/https URL).
        #[arg(long)]
        cws: String,
        /// Optional POS model path.
        #[arg(long)]
        pos: Option<String>,
        /// Optional NER model path.
        #[arg(long)]
        ner: Option<String>,
        /// Text to analyze, one result line per argument.
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Load a custom dictionary and segment the given text.
    Segment {
        /// `;`-joined dictionary shard paths.
        #[arg(long)]
        dict: String,
        /// Text to segment, one result line per argument.
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Load models in the background, poll until ready, then analyze.
    Watch {
        /// Segmentation model path.
        #[arg(long)]
        cws: String,
        /// Optional POS model path.
        #[arg(long)]
        pos: Option<String>,
        /// Optional NER model path.
        #[arg(long)]
        ner: Option<String>,
        /// Give up after this many seconds without the models turning ready.
        #[arg(long, default_value = "60", value_name = "SECS")]
        timeout: u64,
        /// Text to analyze once ready.
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Compile a plain-text dictionary (`word [nature] [frequency]` per
    /// line) into a binary shard.
    Compile {
        /// Input text dictionary.
        input: String,
        /// Output shard path.
        #[arg(long, short)]
        output: String,
    },

    /// List the supported source schemes.
    Schemes,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Analyze {
                cws,
                pos,
                ner,
                text,
            } => run_analyze(&cfg, &cws, pos.as_deref(), ner.as_deref(), &text)?,
            CliCommand::Segment { dict, text } => run_segment(&cfg, &dict, &text)?,
            CliCommand::Watch {
                cws,
                pos,
                ner,
                timeout,
                text,
            } => run_watch(&cfg, &cws, pos.as_deref(), ner.as_deref(), timeout, &text)?,
            CliCommand::Compile { input, output } => {
                run_compile(Path::new(&input), Path::new(&output))?
            }
            CliCommand::Schemes => run_schemes(),
        }

        Ok(())
    }
}
