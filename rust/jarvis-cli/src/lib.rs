#![warn(missing_docs)]

//! # Jarvis CLI
//!
//! A text-mode host for the assistant: one command per line on stdin, one
//! answer per line on stdout. Logs go to stderr and are filtered with
//! `RUST_LOG` (default `info`).
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin jarvis -- run
//! cargo run --bin jarvis -- run --matcher classifier --model-dir model
//! cargo run --bin jarvis -- train rust/jarvis-nlp/corpus/training_data.json
//! cargo run --bin jarvis -- calc what is the square root of 16
//! ```
//!
//! A blank line counts as "nothing heard" and leaves any pending question
//! open.

mod cli;
pub use cli::*;

mod actions;
pub use actions::*;
