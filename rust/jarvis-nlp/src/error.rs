//! Error types for recognition setup: corpora, models and configuration.
//!
//! Nothing here is raised while handling a turn. A turn always produces
//! text; these errors surface only when loading or training.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NlpError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode model artifact: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("training corpus names unknown intent '{tag}'")]
    UnknownIntent { tag: String },

    #[error("training corpus contains no patterns")]
    EmptyCorpus,

    #[error("model artifact '{path}' not found; train the classifier first")]
    MissingModel { path: PathBuf },

    #[error("model artifacts in '{path}' disagree: {reason}")]
    CorruptModel { path: PathBuf, reason: String },

    #[error("unknown matcher '{name}' (expected 'rules' or 'classifier')")]
    UnknownMatcher { name: String },
}

impl NlpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NlpError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        NlpError::Json {
            path: path.into(),
            source,
        }
    }
}
