//! The rule cascade: an ordered table of `(intent, predicate, extractor)`.
//!
//! Rules are tried top-down and the first satisfied predicate decides the
//! intent. Order resolves overlaps: "what is 5 plus 3" satisfies both the
//! calculation and encyclopedia predicates and must be a calculation, "what is
//! the date and time" mentions time but is a date request.
//!
//! Every predicate is a plain function so it can be tested on its own; the
//! table is tested separately for ordering.

use crate::extract::{self, CLOSE_TRIGGERS, Extractor, OPEN_TRIGGERS};
use crate::intent::{Entities, Intent};
use crate::matcher::Recognition;
use crate::token::{Doc, contains_phrase};

pub type Predicate = fn(&Doc) -> bool;

pub struct Rule {
    pub intent: Intent,
    pub predicate: Predicate,
    pub extractor: Extractor,
}

/// Highest priority first. Anything unmatched is [`Intent::Unknown`].
pub const CASCADE: &[Rule] = &[
    Rule {
        intent: Intent::Calculate,
        predicate: is_calculation,
        extractor: extract::calculation,
    },
    Rule {
        intent: Intent::Greet,
        predicate: is_greeting,
        extractor: extract::no_slots,
    },
    Rule {
        intent: Intent::GetTime,
        predicate: asks_time,
        extractor: extract::no_slots,
    },
    Rule {
        intent: Intent::GetDate,
        predicate: asks_date,
        extractor: extract::no_slots,
    },
    Rule {
        intent: Intent::Exit,
        predicate: is_farewell,
        extractor: extract::no_slots,
    },
    Rule {
        intent: Intent::GetWeather,
        predicate: mentions_weather,
        extractor: extract::weather,
    },
    Rule {
        intent: Intent::SearchWikipedia,
        predicate: is_lookup,
        extractor: extract::wikipedia,
    },
    Rule {
        intent: Intent::OpenTarget,
        predicate: is_open,
        extractor: extract::open_target,
    },
    Rule {
        intent: Intent::CloseTarget,
        predicate: is_close,
        extractor: extract::close_target,
    },
    Rule {
        intent: Intent::SetVolume,
        predicate: is_volume,
        extractor: extract::volume,
    },
];

const CALCULATE_TRIGGERS: &[&str] = &["calculate", "compute", "what is", "what's", "result of"];

const MATH_KEYWORDS: &[&str] = &[
    "plus", "minus", "times", "divided", "multiplied", "root", "power", "squared", "cubed", "log",
    "logarithm", "sin", "sine", "cos", "cosine", "tan", "tangent", "factorial", "modulo",
    "modulus",
];

const MATH_SYMBOLS: [char; 4] = ['+', '-', '*', '/'];

/// Words that hand a numeric turn to another intent.
const CALCULATE_VETO: &[&str] = &["time", "date", "weather"];

const GREETINGS: &[&str] = &["hello", "hi", "hey", "greetings"];
const QUESTION_LEMMAS: &[&str] = &["what", "tell"];
const FAREWELLS: &[&str] = &["goodbye", "bye", "exit", "quit", "terminate"];
const LOOKUP_LEMMAS: &[&str] = &["search", "wikipedia"];
const LOOKUP_PHRASES: &[&str] = &["who is", "what is", "tell me about"];
const VOLUME_LEMMAS: &[&str] = &["volume", "sound", "mute", "unmute"];

pub fn is_calculation(doc: &Doc) -> bool {
    let words: Vec<String> = doc.tokens.iter().map(|t| t.lower()).collect();
    if words.iter().any(|w| CALCULATE_VETO.contains(&w.as_str())) || !doc.has_number() {
        return false;
    }

    let lower = doc.lower();
    let triggered = CALCULATE_TRIGGERS
        .iter()
        .any(|phrase| contains_phrase(&lower, phrase));
    let keyword = words.iter().any(|w| MATH_KEYWORDS.contains(&w.as_str()));
    let symbol = lower.contains(MATH_SYMBOLS) || words.iter().any(|w| w == "x");
    triggered || keyword || symbol
}

pub fn is_greeting(doc: &Doc) -> bool {
    doc.has_any_lemma(GREETINGS)
}

pub fn asks_time(doc: &Doc) -> bool {
    doc.has_any_lemma(QUESTION_LEMMAS) && doc.has_lemma("time") && !doc.has_lemma("date")
}

pub fn asks_date(doc: &Doc) -> bool {
    doc.has_any_lemma(QUESTION_LEMMAS) && doc.has_lemma("date")
}

pub fn is_farewell(doc: &Doc) -> bool {
    doc.has_any_lemma(FAREWELLS)
}

pub fn mentions_weather(doc: &Doc) -> bool {
    doc.has_lemma("weather")
}

pub fn is_lookup(doc: &Doc) -> bool {
    let lower = doc.lower();
    let asked = doc.has_any_lemma(LOOKUP_LEMMAS)
        || LOOKUP_PHRASES
            .iter()
            .any(|phrase| contains_phrase(&lower, phrase));
    asked && !doc.has_lemma("weather")
}

pub fn is_open(doc: &Doc) -> bool {
    let lower = doc.lower();
    OPEN_TRIGGERS.iter().any(|phrase| contains_phrase(&lower, phrase))
}

pub fn is_close(doc: &Doc) -> bool {
    let lower = doc.lower();
    CLOSE_TRIGGERS.iter().any(|phrase| contains_phrase(&lower, phrase))
}

pub fn is_volume(doc: &Doc) -> bool {
    doc.has_any_lemma(VOLUME_LEMMAS)
}

/// The first rule whose predicate holds.
pub fn first_match(doc: &Doc) -> Option<&'static Rule> {
    CASCADE.iter().find(|rule| (rule.predicate)(doc))
}

/// Run the cascade and the winning rule's extractor.
pub fn recognize(doc: &Doc) -> Recognition {
    match first_match(doc) {
        Some(rule) => Recognition {
            intent: rule.intent,
            entities: (rule.extractor)(doc),
        },
        None => Recognition {
            intent: Intent::Unknown,
            entities: Entities::new(),
        },
    }
}
