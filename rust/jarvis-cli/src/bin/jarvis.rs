use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use jarvis_cli::{Command, JarvisCli, OfflineWeather, install};
use jarvis_nlp::{Assistant, AssistantConfig, IntentClassifier, MatcherKind, TrainingCorpus};
use tracing_subscriber::EnvFilter;

/// Phrases the freshly trained model is checked against.
const SAMPLE_PHRASES: &[&str] = &[
    "Hey Jarvis",
    "what's the time",
    "weather in Mumbai",
    "open up my calculator",
    "who is shah rukh khan",
    "5 times 10",
    "turn the sound down",
    "that's all for now Jarvis",
];

pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match JarvisCli::parse().command {
        Command::Run {
            config,
            matcher,
            model_dir,
        } => run(&config, matcher, model_dir),
        Command::Train { corpus, model_dir } => train(&corpus, &model_dir),
        Command::Calc { words } => {
            let expression = jarvis_math::translate(&words.join(" "));
            tracing::debug!(%expression, "translated");
            println!("{}", jarvis_math::answer(&expression));
            Ok(())
        }
    }
}

fn run(
    config_path: &Path,
    matcher: Option<MatcherKind>,
    model_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = AssistantConfig::from_path(config_path)
        .with_context(|| format!("loading settings from {}", config_path.display()))?;
    if let Some(matcher) = matcher {
        config.matcher = matcher;
    }
    if let Some(model_dir) = model_dir {
        config.model_dir = model_dir;
    }

    let mut assistant = Assistant::new(&config, Box::new(OfflineWeather));
    install(assistant.dispatcher_mut());

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "JARVIS system online. How can I help you?")?;
    stdout.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading a command from stdin")?;
        let Some(reply) = assistant.handle(Some(&line)) else {
            continue;
        };
        writeln!(stdout, "{}", reply.text)?;
        stdout.flush()?;
        if reply.end_session {
            break;
        }
    }

    Ok(())
}

fn train(corpus_path: &Path, model_dir: &Path) -> Result<()> {
    let corpus = TrainingCorpus::from_path(corpus_path)?;
    let classifier = IntentClassifier::train(&corpus)?;
    classifier.save(model_dir)?;
    tracing::info!(model_dir = %model_dir.display(), "model saved");

    println!("--- Testing Model ---");
    for phrase in SAMPLE_PHRASES {
        println!("'{phrase}' -> Predicted Intent: '{}'", classifier.predict(phrase));
    }
    Ok(())
}
