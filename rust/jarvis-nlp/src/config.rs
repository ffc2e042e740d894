//! Assistant settings.
//!
//! Read from a JSON settings file. Every field has a default, so an empty
//! object (or no file at all) is a valid configuration:
//!
//! ```json
//! {
//!   "matcher": "classifier",
//!   "model_dir": "model",
//!   "default_unit": "celsius"
//! }
//! ```

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialogue::TemperatureUnit;
use crate::error::NlpError;

/// Which intent matcher drives recognition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// The ordered rule cascade.
    #[default]
    Rules,
    /// The trained statistical classifier.
    Classifier,
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherKind::Rules => write!(f, "rules"),
            MatcherKind::Classifier => write!(f, "classifier"),
        }
    }
}

impl FromStr for MatcherKind {
    type Err = NlpError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "rules" | "rule" => Ok(MatcherKind::Rules),
            "classifier" | "model" => Ok(MatcherKind::Classifier),
            _ => Err(NlpError::UnknownMatcher { name: name.into() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub matcher: MatcherKind,
    /// Directory holding the trained classifier artifacts.
    pub model_dir: PathBuf,
    /// When set, weather requests skip the unit question.
    pub default_unit: Option<TemperatureUnit>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            matcher: MatcherKind::default(),
            model_dir: PathBuf::from("model"),
            default_unit: None,
        }
    }
}

impl AssistantConfig {
    /// Load settings from `path`. A missing file yields the defaults; an
    /// unreadable or malformed one is an error.
    pub fn from_path(path: &Path) -> Result<Self, NlpError> {
        match fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).map_err(|e| NlpError::json(path, e)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(NlpError::io(path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[test]
    fn missing_file_is_default() -> TestResult {
        let dir = tempfile::tempdir()?;
        let config = AssistantConfig::from_path(&dir.path().join("settings.json"))?;
        assert_eq!(config, AssistantConfig::default());
        Ok(())
    }

    #[test]
    fn partial_file_keeps_other_defaults() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"matcher": "classifier", "default_unit": "fahrenheit"}"#)?;

        let config = AssistantConfig::from_path(&path)?;
        assert_eq!(config.matcher, MatcherKind::Classifier);
        assert_eq!(config.default_unit, Some(TemperatureUnit::Fahrenheit));
        assert_eq!(config.model_dir, PathBuf::from("model"));
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ matcher: ")?;
        assert!(matches!(
            AssistantConfig::from_path(&path),
            Err(NlpError::Json { .. })
        ));
        Ok(())
    }

    #[test]
    fn matcher_kind_parses() {
        assert_eq!("Rules".parse::<MatcherKind>().unwrap(), MatcherKind::Rules);
        assert_eq!(
            "classifier".parse::<MatcherKind>().unwrap(),
            MatcherKind::Classifier
        );
        assert!("neural".parse::<MatcherKind>().is_err());
    }
}
