//! Multi-turn slot filling for weather requests.
//!
//! The manager owns at most one pending [`Conversation`]. While one is
//! pending, every turn is consumed as its answer, even a turn that would
//! otherwise match a different intent. Answers that do not fill the slot
//! re-prompt and leave the conversation where it was.
//!
//! ```text
//!            get_weather, no location           reply names a place
//!   Idle ──────────────────────────► AwaitingLocation ───────────────┐
//!    │                                  ▲       │                    │
//!    │ get_weather + location           └───────┘ (re-prompt)        ▼
//!    └──────────────────────────────────────────────────────► AwaitingUnit
//!                                                                 │   ▲
//!                     reply names a unit → weather lookup → Idle ◄┘   │
//!                                                    (re-prompt) ─────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::token::{Annotator, EntityLabel, PartOfSpeech};

pub const LOCATION_PROMPT: &str = "Sure, which city would you like the weather for?";
pub const LOCATION_REPROMPT: &str =
    "Sorry, I didn't catch a place name. Which city should I check the weather for?";
pub const UNIT_PROMPT: &str = "Would you like the temperature in Celsius or Fahrenheit?";
pub const UNIT_REPROMPT: &str = "Please say Celsius or Fahrenheit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Match a spoken unit answer.
    ///
    /// Keywords may appear anywhere in the reply ("celsius please"); the bare
    /// letters "c" and "f" only count as the whole reply.
    pub fn from_reply(reply: &str) -> Option<Self> {
        let lower = reply.trim().to_lowercase();
        match lower.as_str() {
            "c" => return Some(TemperatureUnit::Celsius),
            "f" => return Some(TemperatureUnit::Fahrenheit),
            _ => {}
        }
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has = |keys: &[&str]| words.iter().any(|w| keys.contains(w));
        if has(&["celsius", "metric", "centigrade"]) {
            Some(TemperatureUnit::Celsius)
        } else if has(&["fahrenheit", "imperial"]) {
            Some(TemperatureUnit::Fahrenheit)
        } else {
            None
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "celsius"),
            TemperatureUnit::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}

/// The weather service collaborator.
pub trait WeatherLookup {
    fn lookup(&self, location: &str, unit: TemperatureUnit) -> String;
}

/// The pending slot-filling conversation, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Conversation {
    #[default]
    Idle,
    AwaitingLocation {
        intent: Intent,
    },
    AwaitingUnit {
        intent: Intent,
        location: String,
    },
}

impl Conversation {
    pub fn is_pending(&self) -> bool {
        !matches!(self, Conversation::Idle)
    }

    /// The intent the pending conversation is collecting slots for.
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Conversation::Idle => None,
            Conversation::AwaitingLocation { intent }
            | Conversation::AwaitingUnit { intent, .. } => Some(*intent),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DialogueManager {
    state: Conversation,
    default_unit: Option<TemperatureUnit>,
}

impl DialogueManager {
    pub fn new(default_unit: Option<TemperatureUnit>) -> Self {
        DialogueManager {
            state: Conversation::Idle,
            default_unit,
        }
    }

    pub fn state(&self) -> &Conversation {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn reset(&mut self) {
        if self.state.is_pending() {
            tracing::debug!(state = ?self.state, "conversation abandoned");
        }
        self.state = Conversation::Idle;
    }

    /// Start a weather request from an idle state.
    pub fn begin_weather(&mut self, location: Option<String>, weather: &dyn WeatherLookup) -> String {
        match location {
            None => {
                self.state = Conversation::AwaitingLocation {
                    intent: Intent::GetWeather,
                };
                tracing::debug!("awaiting location");
                LOCATION_PROMPT.to_string()
            }
            Some(location) => self.with_location(location, weather),
        }
    }

    fn with_location(&mut self, location: String, weather: &dyn WeatherLookup) -> String {
        match self.default_unit {
            Some(unit) => self.finish(&location, unit, weather),
            None => {
                tracing::debug!(%location, "awaiting unit");
                self.state = Conversation::AwaitingUnit {
                    intent: Intent::GetWeather,
                    location,
                };
                UNIT_PROMPT.to_string()
            }
        }
    }

    fn finish(&mut self, location: &str, unit: TemperatureUnit, weather: &dyn WeatherLookup) -> String {
        tracing::debug!(location, %unit, "weather slots filled");
        self.state = Conversation::Idle;
        weather.lookup(location, unit)
    }

    /// Consume a turn as the answer to the pending question.
    ///
    /// Returns `None` when nothing is pending.
    pub fn resume(
        &mut self,
        turn: &str,
        annotator: &dyn Annotator,
        weather: &dyn WeatherLookup,
    ) -> Option<String> {
        match std::mem::take(&mut self.state) {
            Conversation::Idle => None,
            Conversation::AwaitingLocation { intent } => match place_in(turn, annotator) {
                Some(location) => Some(self.with_location(location, weather)),
                None => {
                    self.state = Conversation::AwaitingLocation { intent };
                    Some(LOCATION_REPROMPT.to_string())
                }
            },
            Conversation::AwaitingUnit { intent, location } => {
                match TemperatureUnit::from_reply(turn) {
                    Some(unit) => Some(self.finish(&location, unit, weather)),
                    None => {
                        self.state = Conversation::AwaitingUnit { intent, location };
                        Some(UNIT_REPROMPT.to_string())
                    }
                }
            }
        }
    }
}

/// A place named by a reply: a GPE span, or a reply that is a single noun.
///
/// Transcribed speech is usually lowercase, so a lone common noun
/// ("springfield") counts as well as a capitalized one.
fn place_in(turn: &str, annotator: &dyn Annotator) -> Option<String> {
    let doc = annotator.annotate(turn);
    if let Some(place) = doc.first_entity(EntityLabel::Gpe) {
        return Some(place.text.clone());
    }
    let words: Vec<_> = doc.words().collect();
    match words.as_slice() {
        [only] if matches!(only.pos, PartOfSpeech::ProperNoun | PartOfSpeech::Noun) => {
            Some(only.text.clone())
        }
        _ => None,
    }
}
