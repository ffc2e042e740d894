//! The closed set of intents and the slots they carry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NlpError;

/// What a command asks the assistant to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greet,
    GetTime,
    GetDate,
    Exit,
    GetWeather,
    SearchWikipedia,
    Calculate,
    OpenTarget,
    CloseTarget,
    SetVolume,
    Unknown,
    /// The trained classifier could not be loaded.
    ModelError,
}

impl Intent {
    pub const ALL: [Intent; 12] = [
        Intent::Greet,
        Intent::GetTime,
        Intent::GetDate,
        Intent::Exit,
        Intent::GetWeather,
        Intent::SearchWikipedia,
        Intent::Calculate,
        Intent::OpenTarget,
        Intent::CloseTarget,
        Intent::SetVolume,
        Intent::Unknown,
        Intent::ModelError,
    ];

    /// The tag used in training corpora and model artifacts.
    pub fn tag(self) -> &'static str {
        match self {
            Intent::Greet => "greet",
            Intent::GetTime => "get_time",
            Intent::GetDate => "get_date",
            Intent::Exit => "exit",
            Intent::GetWeather => "get_weather",
            Intent::SearchWikipedia => "search_wikipedia",
            Intent::Calculate => "calculate",
            Intent::OpenTarget => "open_target",
            Intent::CloseTarget => "close_target",
            Intent::SetVolume => "set_volume",
            Intent::Unknown => "unknown",
            Intent::ModelError => "model_error",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Intent {
    type Err = NlpError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.tag() == tag)
            .ok_or_else(|| NlpError::UnknownIntent { tag: tag.into() })
    }
}

/// A named value an intent needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Place for a weather lookup.
    Location,
    /// Encyclopedia search terms.
    Query,
    /// Application or website to open or close.
    Target,
    /// Volume level, 0 to 100.
    Level,
    /// Canonical arithmetic expression.
    Expression,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Location => write!(f, "location"),
            Slot::Query => write!(f, "query"),
            Slot::Target => write!(f, "target"),
            Slot::Level => write!(f, "level"),
            Slot::Expression => write!(f, "expression"),
        }
    }
}

/// Slots extracted for one turn. A slot that could not be extracted is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub values: BTreeMap<Slot, String>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: Slot, value: impl Into<String>) {
        self.values.insert(slot, value.into());
    }

    /// Builder form of [`Entities::set`].
    pub fn with(mut self, slot: Slot, value: impl Into<String>) -> Self {
        self.set(slot, value);
        self
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.values.get(&slot).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Entities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (slot, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{slot}={value:?}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(intent.tag().parse::<Intent>().unwrap(), intent);
        }
        assert!(matches!(
            "get_news".parse::<Intent>(),
            Err(NlpError::UnknownIntent { .. })
        ));
    }

    #[test]
    fn serde_uses_tags() {
        let json = serde_json::to_string(&Intent::SearchWikipedia).unwrap();
        assert_eq!(json, "\"search_wikipedia\"");
        let intent: Intent = serde_json::from_str("\"model_error\"").unwrap();
        assert_eq!(intent, Intent::ModelError);
    }

    #[test]
    fn entities_display_in_slot_order() {
        let entities = Entities::new()
            .with(Slot::Query, "rust")
            .with(Slot::Location, "Paris");
        assert_eq!(entities.to_string(), r#"{location="Paris", query="rust"}"#);
        assert_eq!(entities.get(Slot::Target), None);
    }
}
