//! # jarvis-nlp
//!
//! Turns one spoken or typed command into a response: intent recognition,
//! slot extraction, multi-turn clarification and dispatch.
//!
//! ## Architecture
//!
//! ```text
//! text → Annotator (tokens, lemmas, POS, dependencies, entity spans)
//!   → pending conversation? → DialogueManager (consumes the turn)
//!   → IntentMatcher (rule cascade | trained classifier)
//!     → extractor table (slots; calculations go through jarvis-math)
//!       → get_weather → DialogueManager (location, then unit)
//!       → everything else → Dispatcher (intent → handler)
//! ```
//!
//! The two matchers are interchangeable behind [`IntentMatcher`]; which one
//! runs is chosen by [`AssistantConfig::matcher`]. The classifier is trained
//! offline from a pattern corpus ([`TrainingCorpus`]) and persisted as JSON.
//!
//! ## Example
//!
//! ```
//! use jarvis_nlp::{Assistant, AssistantConfig, Intent, TemperatureUnit, WeatherLookup};
//!
//! struct Offline;
//!
//! impl WeatherLookup for Offline {
//!     fn lookup(&self, location: &str, unit: TemperatureUnit) -> String {
//!         format!("No forecast for {location} in {unit}.")
//!     }
//! }
//!
//! let mut assistant = Assistant::new(&AssistantConfig::default(), Box::new(Offline));
//!
//! let reply = assistant.handle(Some("what is 5 plus 3")).unwrap();
//! assert_eq!(reply.intent, Intent::Calculate);
//! assert_eq!(reply.text, "The result is 8");
//!
//! assistant.handle(Some("what's the weather like"));
//! assistant.handle(Some("London"));
//! let reply = assistant.handle(Some("celsius")).unwrap();
//! assert_eq!(reply.text, "No forecast for London in celsius.");
//! ```

pub mod assistant;
pub mod classifier;
pub mod config;
pub mod dialogue;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod intent;
pub mod lexicon;
pub mod matcher;
pub mod rules;
pub mod token;

pub use assistant::{Assistant, Reply};
pub use classifier::{IntentClassifier, TrainingCorpus};
pub use config::{AssistantConfig, MatcherKind};
pub use dialogue::{Conversation, DialogueManager, TemperatureUnit, WeatherLookup};
pub use dispatch::Dispatcher;
pub use error::NlpError;
pub use intent::{Entities, Intent, Slot};
pub use lexicon::LexicalAnnotator;
pub use matcher::{ClassifierMatcher, IntentMatcher, Recognition, RuleMatcher};
pub use token::{Annotator, Doc, EntityLabel, EntitySpan, Token};
