use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jarvis_nlp::MatcherKind;

/// Top-level arguments of the `jarvis` binary.
#[derive(Debug, Parser)]
#[command(name = "jarvis")]
#[command(bin_name = "jarvis")]
#[command(about = "A text-mode voice assistant", long_about = None)]
pub struct JarvisCli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// The `jarvis` subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read commands from stdin, one per line, and answer each.
    Run {
        /// JSON settings file.
        #[arg(short, long, default_value = "config/settings.json")]
        config: PathBuf,

        /// Override the configured intent matcher (`rules` or `classifier`).
        #[arg(short, long)]
        matcher: Option<MatcherKind>,

        /// Override the configured model directory.
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },

    /// Train the intent classifier from a pattern corpus and save it.
    Train {
        /// Corpus file of `{"intents": [{"tag", "patterns"}]}`.
        corpus: PathBuf,

        /// Where the model artifacts are written.
        #[arg(long, default_value = "model")]
        model_dir: PathBuf,
    },

    /// Translate and evaluate one spoken calculation.
    Calc {
        /// The phrase, e.g. `five plus three` or `square root of 16`.
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
}
