//! Per-intent slot extraction.
//!
//! Each intent owns one [`Extractor`]. Extractors never fail: a slot that
//! cannot be found is left out of the [`Entities`], which is how callers
//! know to ask for it.
//!
//! | Intent | Slot | Source, in priority order |
//! |---|---|---|
//! | `get_weather` | location | GPE span → object of a preposition on "weather" → word after "weather in/for/of" |
//! | `search_wikipedia` | query | text after a trigger phrase → nouns and adjectives → tokens from the third on |
//! | `open_target` / `close_target` | target | text after the longest trigger, articles and "app"/"browser" dropped |
//! | `set_volume` | level | first numeric cardinal, quantity or percentage |
//! | `calculate` | expression | whole turn through the spoken-math translator |

use jarvis_math::translate;

use crate::intent::{Entities, Intent, Slot};
use crate::token::{Dependency, Doc, EntityLabel, PartOfSpeech, find_phrase};

/// Pulls an intent's slots out of an annotated turn.
pub type Extractor = fn(&Doc) -> Entities;

/// Checked in order; the first present wins.
pub const WIKIPEDIA_TRIGGERS: &[&str] = &[
    "search wikipedia for",
    "wikipedia",
    "search for",
    "who is",
    "what is",
    "tell me about",
];

const QUERY_STOP_LEMMAS: &[&str] = &["search", "wikipedia", "tell", "me", "about"];

pub const OPEN_TRIGGERS: &[&str] = &[
    "open up",
    "open",
    "launch",
    "go to",
    "navigate to",
    "browse to",
    "bring up",
    "start",
    "run",
];

pub const CLOSE_TRIGGERS: &[&str] = &["close", "terminate", "kill", "shut down", "stop", "quit"];

const TARGET_ARTICLES: &[&str] = &["the", "my", "a", "an"];
const TARGET_SUFFIXES: &[&str] = &["app", "application", "browser"];

/// Prepositions that introduce a place right after "weather".
const WEATHER_PREPOSITIONS: &[&str] = &["in", "for", "of"];

/// The extractor for an intent. Intents without slots get an empty bag.
pub fn for_intent(intent: Intent) -> Extractor {
    match intent {
        Intent::GetWeather => weather,
        Intent::SearchWikipedia => wikipedia,
        Intent::OpenTarget => open_target,
        Intent::CloseTarget => close_target,
        Intent::SetVolume => volume,
        Intent::Calculate => calculation,
        _ => no_slots,
    }
}

pub fn extract(intent: Intent, doc: &Doc) -> Entities {
    for_intent(intent)(doc)
}

pub fn no_slots(_: &Doc) -> Entities {
    Entities::new()
}

/// Resolve the place a weather request is about.
pub fn location(doc: &Doc) -> Option<String> {
    if let Some(place) = doc.first_entity(EntityLabel::Gpe) {
        return Some(place.text.clone());
    }

    for token in doc.tokens.iter().filter(|t| t.lemma == "weather") {
        let i = token.position;
        for prep in doc
            .children(i)
            .filter(|c| matches!(c.dep, Dependency::Prep | Dependency::Pobj))
        {
            let object = doc.children(prep.position).find(|c| {
                matches!(c.pos, PartOfSpeech::ProperNoun | PartOfSpeech::Noun)
            });
            if let Some(object) = object {
                return Some(object.text.clone());
            }
        }
        if i + 2 < doc.len()
            && WEATHER_PREPOSITIONS.contains(&doc.tokens[i + 1].lemma.as_str())
        {
            return Some(doc.tokens[i + 2].text.clone());
        }
    }

    None
}

pub fn weather(doc: &Doc) -> Entities {
    let mut entities = Entities::new();
    if let Some(place) = location(doc) {
        entities.set(Slot::Location, place);
    }
    entities
}

fn clean_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_end_matches(['?', '!', '.', ',']))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn wikipedia(doc: &Doc) -> Entities {
    let lower = doc.lower();

    let after_trigger = WIKIPEDIA_TRIGGERS.iter().find_map(|phrase| {
        find_phrase(&lower, phrase).map(|at| clean_words(&lower[at + phrase.len()..]))
    });
    let words = after_trigger.unwrap_or_else(|| {
        doc.tokens
            .iter()
            .filter(|t| {
                matches!(
                    t.pos,
                    PartOfSpeech::ProperNoun | PartOfSpeech::Noun | PartOfSpeech::Adjective
                ) && !QUERY_STOP_LEMMAS.contains(&t.lemma.as_str())
            })
            .map(|t| t.text.clone())
            .collect()
    });

    let mut entities = Entities::new();
    if !words.is_empty() {
        entities.set(Slot::Query, words.join(" "));
    } else if doc.len() > 2 {
        let tail: Vec<&str> = doc.tokens[2..]
            .iter()
            .filter(|t| t.pos != PartOfSpeech::Punctuation)
            .map(|t| t.text.as_str())
            .collect();
        if !tail.is_empty() {
            entities.set(Slot::Query, tail.join(" "));
        }
    }
    entities
}

/// The longest trigger phrase present in `lower`, with its byte offset.
/// Equal lengths keep list order.
pub fn longest_trigger<'a>(lower: &str, triggers: &[&'a str]) -> Option<(&'a str, usize)> {
    let mut best: Option<(&'a str, usize)> = None;
    for &trigger in triggers {
        if let Some(at) = find_phrase(lower, trigger) {
            if best.is_none_or(|(b, _)| trigger.len() > b.len()) {
                best = Some((trigger, at));
            }
        }
    }
    best
}

fn target(doc: &Doc, triggers: &[&str]) -> Entities {
    let mut entities = Entities::new();
    let lower = doc.lower();
    let Some((trigger, at)) = longest_trigger(&lower, triggers) else {
        return entities;
    };

    let mut words = clean_words(&lower[at + trigger.len()..]);
    while words.first().is_some_and(|w| TARGET_ARTICLES.contains(&w.as_str())) {
        words.remove(0);
    }
    if words.last().is_some_and(|w| w == "please") {
        words.pop();
    }
    if words.len() > 1 && words.last().is_some_and(|w| TARGET_SUFFIXES.contains(&w.as_str())) {
        words.pop();
    }

    if !words.is_empty() {
        entities.set(Slot::Target, words.join(" "));
    }
    entities
}

pub fn open_target(doc: &Doc) -> Entities {
    target(doc, OPEN_TRIGGERS)
}

pub fn close_target(doc: &Doc) -> Entities {
    target(doc, CLOSE_TRIGGERS)
}

pub fn volume(doc: &Doc) -> Entities {
    let mut entities = Entities::new();
    let level = doc
        .entities
        .iter()
        .filter(|e| {
            matches!(
                e.label,
                EntityLabel::Cardinal | EntityLabel::Quantity | EntityLabel::Percent
            )
        })
        .find_map(|e| {
            e.text
                .trim_end_matches('%')
                .trim_end_matches("percent")
                .trim()
                .parse::<i64>()
                .ok()
        });
    if let Some(level) = level {
        entities.set(Slot::Level, level.to_string());
    }
    entities
}

pub fn calculation(doc: &Doc) -> Entities {
    Entities::new().with(Slot::Expression, translate(&doc.text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexicalAnnotator;
    use crate::token::Annotator;
    use pretty_assertions::assert_eq;

    fn slot(intent: Intent, text: &str, slot: Slot) -> Option<String> {
        let doc = LexicalAnnotator.annotate(text);
        extract(intent, &doc).get(slot).map(str::to_string)
    }

    #[test]
    fn location_prefers_gpe_spans() {
        assert_eq!(
            slot(Intent::GetWeather, "what's the weather like in London", Slot::Location),
            Some("London".into())
        );
        assert_eq!(
            slot(Intent::GetWeather, "what is the current weather for New Delhi", Slot::Location),
            Some("New Delhi".into())
        );
    }

    #[test]
    fn location_falls_back_to_preposition_object() {
        assert_eq!(
            slot(Intent::GetWeather, "weather in springfield", Slot::Location),
            Some("springfield".into())
        );
    }

    #[test]
    fn location_falls_back_to_word_after_preposition() {
        // The object is a numeral, so only the positional rule applies.
        assert_eq!(
            slot(Intent::GetWeather, "weather for 5", Slot::Location),
            Some("5".into())
        );
    }

    #[test]
    fn missing_location_is_absent() {
        let doc = LexicalAnnotator.annotate("what is the weather");
        assert!(extract(Intent::GetWeather, &doc).is_empty());
    }

    #[test]
    fn wikipedia_query_after_trigger() {
        assert_eq!(
            slot(Intent::SearchWikipedia, "search Wikipedia for Python programming", Slot::Query),
            Some("python programming".into())
        );
        assert_eq!(
            slot(Intent::SearchWikipedia, "who is Albert Einstein?", Slot::Query),
            Some("albert einstein".into())
        );
        assert_eq!(
            slot(Intent::SearchWikipedia, "tell me about the Eiffel Tower", Slot::Query),
            Some("the eiffel tower".into())
        );
    }

    #[test]
    fn wikipedia_query_from_nouns() {
        assert_eq!(
            slot(Intent::SearchWikipedia, "search quantum physics", Slot::Query),
            Some("quantum physics".into())
        );
    }

    #[test]
    fn wikipedia_query_from_tail() {
        // Trigger present but nothing follows it.
        assert_eq!(
            slot(Intent::SearchWikipedia, "please just search for", Slot::Query),
            Some("search for".into())
        );
    }

    #[test]
    fn open_target_uses_longest_trigger() {
        assert_eq!(
            slot(Intent::OpenTarget, "open up my calculator", Slot::Target),
            Some("calculator".into())
        );
        assert_eq!(
            slot(Intent::OpenTarget, "launch the spotify app", Slot::Target),
            Some("spotify".into())
        );
        assert_eq!(
            slot(Intent::OpenTarget, "go to github.com", Slot::Target),
            Some("github.com".into())
        );
    }

    #[test]
    fn close_target_strips_suffix() {
        assert_eq!(
            slot(Intent::CloseTarget, "close chrome browser", Slot::Target),
            Some("chrome".into())
        );
        assert_eq!(
            slot(Intent::CloseTarget, "shut down notepad please", Slot::Target),
            Some("notepad".into())
        );
        assert_eq!(slot(Intent::CloseTarget, "close", Slot::Target), None);
    }

    #[test]
    fn volume_level_from_numbers() {
        assert_eq!(
            slot(Intent::SetVolume, "set volume to 40", Slot::Level),
            Some("40".into())
        );
        assert_eq!(
            slot(Intent::SetVolume, "set volume to 75%", Slot::Level),
            Some("75".into())
        );
        assert_eq!(
            slot(Intent::SetVolume, "set the volume to forty", Slot::Level),
            None
        );
    }

    #[test]
    fn calculation_translates_the_turn() {
        assert_eq!(
            slot(Intent::Calculate, "what is 5 plus 3", Slot::Expression),
            Some("5 + 3".into())
        );
    }
}
