//! The per-turn pipeline.
//!
//! ```text
//! turn ──► pending conversation? ──yes──► DialogueManager::resume
//!               │ no
//!               ▼
//!          annotate ─► IntentMatcher ─► get_weather? ──yes──► DialogueManager::begin_weather
//!                                           │ no
//!                                           ▼
//!                                       Dispatcher
//! ```
//!
//! Turns are handled strictly one at a time; the assistant is the only owner
//! of the conversation state.

use crate::config::AssistantConfig;
use crate::dialogue::{Conversation, DialogueManager, WeatherLookup};
use crate::dispatch::Dispatcher;
use crate::intent::{Intent, Slot};
use crate::lexicon::LexicalAnnotator;
use crate::matcher::{self, IntentMatcher};
use crate::token::Annotator;

/// What the assistant says back for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The intent the turn was handled as. A turn answering a pending
    /// question carries the intent of that conversation.
    pub intent: Intent,
    pub text: String,
    /// The host loop should stop after speaking this reply.
    pub end_session: bool,
}

pub struct Assistant {
    annotator: Box<dyn Annotator>,
    matcher: Box<dyn IntentMatcher>,
    dialogue: DialogueManager,
    dispatcher: Dispatcher,
    weather: Box<dyn WeatherLookup>,
}

impl Assistant {
    /// An assistant with the lexical annotator, the configured matcher and
    /// the built-in handlers.
    pub fn new(config: &AssistantConfig, weather: Box<dyn WeatherLookup>) -> Self {
        tracing::info!(matcher = %config.matcher, "assistant ready");
        Assistant::with_parts(
            Box::new(LexicalAnnotator::new()),
            matcher::from_config(config),
            DialogueManager::new(config.default_unit),
            Dispatcher::with_defaults(),
            weather,
        )
    }

    pub fn with_parts(
        annotator: Box<dyn Annotator>,
        matcher: Box<dyn IntentMatcher>,
        dialogue: DialogueManager,
        dispatcher: Dispatcher,
        weather: Box<dyn WeatherLookup>,
    ) -> Self {
        Assistant {
            annotator,
            matcher,
            dialogue,
            dispatcher,
            weather,
        }
    }

    /// Register further handlers, typically ones backed by external services.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn conversation(&self) -> &Conversation {
        self.dialogue.state()
    }

    /// Abandon any pending conversation.
    pub fn reset(&mut self) {
        self.dialogue.reset();
    }

    /// Handle one turn.
    ///
    /// `None` or blank text means no input arrived this cycle: nothing is
    /// said and a pending conversation stays resumable.
    pub fn handle(&mut self, turn: Option<&str>) -> Option<Reply> {
        let text = turn.map(str::trim).filter(|text| !text.is_empty())?;

        if let Some(intent) = self.dialogue.state().intent() {
            let reply = self
                .dialogue
                .resume(text, self.annotator.as_ref(), self.weather.as_ref())?;
            return Some(Reply {
                intent,
                text: reply,
                end_session: false,
            });
        }

        let doc = self.annotator.annotate(text);
        let recognition = self.matcher.recognize(&doc);
        tracing::debug!(
            text,
            intent = %recognition.intent,
            entities = %recognition.entities,
            "turn recognized"
        );

        let reply = match recognition.intent {
            Intent::GetWeather => {
                let location = recognition.entities.get(Slot::Location).map(String::from);
                self.dialogue.begin_weather(location, self.weather.as_ref())
            }
            intent => self.dispatcher.dispatch(intent, &recognition.entities),
        };

        Some(Reply {
            intent: recognition.intent,
            text: reply,
            end_session: recognition.intent == Intent::Exit,
        })
    }
}
