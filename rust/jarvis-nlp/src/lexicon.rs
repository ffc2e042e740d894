//! A rule-based [`Annotator`] that needs no downloaded model.
//!
//! Everything here is table lookup plus a few positional heuristics:
//!
//! - **Tokens**: whitespace split, punctuation and operator characters
//!   peeled off, clitics split ("what's" → "what" + "'s").
//! - **Lemmas**: lowercase, an irregular-form table, plural stripping for
//!   open-class words.
//! - **Parts of speech**: closed-class word lists, numerals, capitalization
//!   for proper nouns, nouns otherwise.
//! - **Dependencies**: a preposition attaches to the preceding content word,
//!   and the nominal after it becomes its object. Everything else hangs off
//!   the root.
//! - **Entities**: places from a gazetteer, capitalized runs after a
//!   locative preposition as places, other capitalized runs as people,
//!   numerals as cardinals or percentages.
//!
//! It is not a general tagger; it is tuned to produce the annotations the
//! intent rules and slot extractors look for.

use crate::token::{Annotator, Dependency, Doc, EntityLabel, EntitySpan, PartOfSpeech, Token};

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "every", "each", "no",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "what", "who", "whom",
    "which", "whose", "myself", "yourself", "something", "anything",
];

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "for", "of", "to", "from", "with", "by", "about", "near", "into", "over",
    "under", "after", "before", "like", "through", "between", "around",
];

const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "am", "be", "been", "being", "'s", "'re", "'m", "do", "does",
    "did", "can", "could", "will", "would", "shall", "should", "may", "might", "must", "has",
    "have", "had", "'ll", "'ve", "'d",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "so", "yet", "if"];

const PARTICLES: &[&str] = &["not", "n't"];

const INTERJECTIONS: &[&str] = &[
    "hello", "hi", "hey", "greetings", "bye", "goodbye", "please", "thanks", "yes", "ok", "okay",
];

const ADVERBS: &[&str] = &[
    "now", "currently", "today", "tomorrow", "tonight", "right", "just", "very", "really",
    "there", "here", "how", "when", "where", "why", "up", "down", "out", "again",
];

const ADJECTIVES: &[&str] = &[
    "current", "good", "big", "small", "loud", "quiet", "high", "low", "latest", "local",
    "random", "full",
];

const VERBS: &[&str] = &[
    "search", "tell", "open", "launch", "start", "run", "close", "terminate", "kill", "shut",
    "set", "turn", "go", "find", "calculate", "compute", "show", "give", "check", "get", "make",
    "need", "want", "know", "look", "quit", "exit", "stop", "navigate", "bring", "mute",
];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    "hundred", "thousand", "million",
];

/// Inflected forms whose lemma is not reachable by suffix stripping.
const IRREGULAR: &[(&str, &str)] = &[
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("am", "be"),
    ("'s", "be"),
    ("'re", "be"),
    ("'m", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("'ve", "have"),
    ("does", "do"),
    ("did", "do"),
    ("'ll", "will"),
    ("'d", "would"),
    ("n't", "not"),
    ("went", "go"),
    ("gone", "go"),
    ("greetings", "greetings"),
    ("news", "news"),
    ("thanks", "thanks"),
    ("always", "always"),
];

/// Multi-word entries are matched token by token.
const GAZETTEER: &[&str] = &[
    "new york",
    "new delhi",
    "los angeles",
    "san francisco",
    "hong kong",
    "united states",
    "united kingdom",
    "london",
    "paris",
    "berlin",
    "madrid",
    "rome",
    "moscow",
    "tokyo",
    "beijing",
    "shanghai",
    "sydney",
    "toronto",
    "chicago",
    "boston",
    "seattle",
    "dubai",
    "singapore",
    "cairo",
    "lagos",
    "nairobi",
    "delhi",
    "mumbai",
    "kolkata",
    "chennai",
    "bangalore",
    "hyderabad",
    "pune",
    "india",
    "france",
    "germany",
    "spain",
    "italy",
    "japan",
    "china",
    "russia",
    "brazil",
    "mexico",
    "canada",
    "australia",
    "america",
    "usa",
    "uk",
];

/// Prepositions after which a capitalized run names a place.
const LOCATIVE: &[&str] = &["in", "at", "for", "near", "of", "from", "to"];

/// Characters split off as tokens of their own.
const SEPARATORS: &[char] = &[
    '+', '*', '/', '=', '^', '(', ')', '?', '!', ',', ';', ':', '"', '%',
];

const CLITICS: &[&str] = &["n't", "'s", "'re", "'m", "'ll", "'ve", "'d"];

/// Gazetteer-and-word-list annotator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalAnnotator;

impl LexicalAnnotator {
    pub fn new() -> Self {
        LexicalAnnotator
    }
}

impl Annotator for LexicalAnnotator {
    fn annotate(&self, text: &str) -> Doc {
        let words = split_words(text);
        let places = find_places(&words);

        let mut tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(position, word)| {
                let lower = word.to_lowercase();
                let in_place = places.iter().any(|(start, end)| (*start..*end).contains(&position));
                let pos = tag(word, &lower, in_place);
                Token {
                    text: word.clone(),
                    lemma: lemmatize(&lower, pos),
                    pos,
                    dep: Dependency::Other,
                    head: 0,
                    position,
                }
            })
            .collect();

        attach(&mut tokens);
        let entities = spans(&tokens, &places);

        Doc {
            text: text.to_string(),
            tokens,
            entities,
        }
    }
}

/// Split text into word, number, clitic and punctuation tokens.
pub fn split_words(text: &str) -> Vec<String> {
    let normalized = text.replace('\u{2019}', "'");
    let mut words = Vec::new();

    for chunk in normalized.split_whitespace() {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let separator = match c {
                '.' => !(prev.is_some_and(|p| p.is_ascii_digit())
                    && next.is_some_and(|n| n.is_ascii_digit())),
                '-' => !(prev.is_some_and(char::is_alphabetic)
                    && next.is_some_and(char::is_alphabetic)),
                _ => SEPARATORS.contains(&c),
            };
            if separator {
                if !current.is_empty() {
                    words.extend(split_clitic(&current));
                    current.clear();
                }
                words.push(c.to_string());
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            words.extend(split_clitic(&current));
        }
    }

    words
}

fn split_clitic(word: &str) -> Vec<String> {
    let lower = word.to_lowercase();
    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) {
            let cut = word.len() - clitic.len();
            if word.is_char_boundary(cut) {
                return vec![word[..cut].to_string(), word[cut..].to_string()];
            }
        }
    }
    vec![word.to_string()]
}

fn is_punctuation(word: &str) -> bool {
    !word.chars().any(char::is_alphanumeric) && !word.starts_with('\'')
}

fn tag(word: &str, lower: &str, in_place: bool) -> PartOfSpeech {
    if is_punctuation(word) {
        return PartOfSpeech::Punctuation;
    }
    if word.starts_with(|c: char| c.is_ascii_digit()) || NUMBER_WORDS.contains(&lower) {
        return PartOfSpeech::Numeral;
    }
    if in_place {
        return PartOfSpeech::ProperNoun;
    }

    let closed = [
        (DETERMINERS, PartOfSpeech::Determiner),
        (PRONOUNS, PartOfSpeech::Pronoun),
        (ADPOSITIONS, PartOfSpeech::Adposition),
        (AUXILIARIES, PartOfSpeech::Auxiliary),
        (CONJUNCTIONS, PartOfSpeech::Conjunction),
        (PARTICLES, PartOfSpeech::Particle),
        (INTERJECTIONS, PartOfSpeech::Interjection),
        (ADVERBS, PartOfSpeech::Adverb),
        (ADJECTIVES, PartOfSpeech::Adjective),
        (VERBS, PartOfSpeech::Verb),
    ];
    if let Some((_, pos)) = closed.iter().find(|(list, _)| list.contains(&lower)) {
        return *pos;
    }

    if word.starts_with(char::is_uppercase) {
        PartOfSpeech::ProperNoun
    } else {
        PartOfSpeech::Noun
    }
}

fn lemmatize(lower: &str, pos: PartOfSpeech) -> String {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == lower) {
        return lemma.to_string();
    }
    if !matches!(pos, PartOfSpeech::Noun | PartOfSpeech::Verb) || lower.len() <= 3 {
        return lower.to_string();
    }
    if let Some(stem) = lower.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for sibilant in ["ches", "shes", "sses", "xes"] {
        if lower.ends_with(sibilant) {
            return lower[..lower.len() - 2].to_string();
        }
    }
    if lower.ends_with('s') && !["ss", "us", "is", "ys"].iter().any(|s| lower.ends_with(s)) {
        return lower[..lower.len() - 1].to_string();
    }
    lower.to_string()
}

/// Gazetteer matches as `(start, end)` token ranges, longest entry first.
fn find_places(words: &[String]) -> Vec<(usize, usize)> {
    let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let mut places = Vec::new();
    let mut i = 0;
    while i < lower.len() {
        let hit = GAZETTEER.iter().find_map(|entry| {
            let parts: Vec<&str> = entry.split(' ').collect();
            let end = i + parts.len();
            (end <= lower.len() && lower[i..end].iter().zip(&parts).all(|(w, p)| w == p))
                .then_some(end)
        });
        match hit {
            Some(end) => {
                places.push((i, end));
                i = end;
            }
            None => i += 1,
        }
    }
    places
}

fn is_content(pos: PartOfSpeech) -> bool {
    pos.is_nominal()
        || matches!(
            pos,
            PartOfSpeech::Verb | PartOfSpeech::Adjective | PartOfSpeech::Interjection
        )
}

/// Assign dependency arcs.
fn attach(tokens: &mut [Token]) {
    let root = tokens
        .iter()
        .position(|t| t.pos == PartOfSpeech::Verb)
        .or_else(|| tokens.iter().position(|t| is_content(t.pos)))
        .unwrap_or(0);

    for token in tokens.iter_mut() {
        token.head = root;
        token.dep = match token.pos {
            PartOfSpeech::Punctuation => Dependency::Punct,
            _ => Dependency::Other,
        };
    }
    if let Some(token) = tokens.get_mut(root) {
        token.dep = Dependency::Root;
    }

    for i in 0..tokens.len() {
        if tokens[i].pos == PartOfSpeech::Determiner {
            if let Some(j) = (i + 1..tokens.len()).find(|&j| tokens[j].pos.is_nominal()) {
                tokens[i].dep = Dependency::Det;
                tokens[i].head = j;
            }
        }
    }

    for i in 0..tokens.len() {
        if tokens[i].pos != PartOfSpeech::Adposition {
            continue;
        }
        if let Some(h) = (0..i).rev().find(|&h| is_content(tokens[h].pos)) {
            tokens[i].head = h;
        }
        if i != root {
            tokens[i].dep = Dependency::Prep;
        }

        // The object is the last nominal of the first nominal run after the
        // preposition; earlier members of the run are compounds of it.
        let mut k = i + 1;
        while k < tokens.len()
            && matches!(
                tokens[k].pos,
                PartOfSpeech::Determiner | PartOfSpeech::Adjective
            )
        {
            k += 1;
        }
        let start = k;
        while k < tokens.len() && tokens[k].pos.is_nominal() {
            k += 1;
        }
        if k > start {
            let object = k - 1;
            tokens[object].dep = Dependency::Pobj;
            tokens[object].head = i;
            for compound in start..object {
                tokens[compound].dep = Dependency::Compound;
                tokens[compound].head = object;
            }
        }
    }
}

fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spans(tokens: &[Token], places: &[(usize, usize)]) -> Vec<EntitySpan> {
    let mut entities: Vec<EntitySpan> = places
        .iter()
        .map(|&(start, end)| EntitySpan {
            text: join(&tokens[start..end]),
            label: EntityLabel::Gpe,
            start,
            end,
        })
        .collect();

    // Capitalized proper-noun runs outside the gazetteer.
    let mut i = 0;
    while i < tokens.len() {
        let capitalized = |t: &Token| {
            t.pos == PartOfSpeech::ProperNoun && t.text.starts_with(char::is_uppercase)
        };
        let covered = places.iter().any(|(s, e)| (*s..*e).contains(&i));
        if covered || !capitalized(&tokens[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < tokens.len()
            && capitalized(&tokens[i])
            && !places.iter().any(|(s, e)| (*s..*e).contains(&i))
        {
            i += 1;
        }
        let after_locative = start
            .checked_sub(1)
            .is_some_and(|p| LOCATIVE.contains(&tokens[p].lemma.as_str()));
        entities.push(EntitySpan {
            text: join(&tokens[start..i]),
            label: if after_locative {
                EntityLabel::Gpe
            } else {
                EntityLabel::Person
            },
            start,
            end: i,
        });
    }

    // Numerals, with a following "%" or "percent" making a percentage.
    for (i, token) in tokens.iter().enumerate() {
        if token.pos != PartOfSpeech::Numeral {
            continue;
        }
        let percent = tokens
            .get(i + 1)
            .is_some_and(|n| n.text == "%" || n.lemma == "percent");
        let (label, end) = if percent {
            (EntityLabel::Percent, i + 2)
        } else {
            (EntityLabel::Cardinal, i + 1)
        };
        let text = if percent && tokens[i + 1].text == "%" {
            format!("{}%", token.text)
        } else {
            join(&tokens[i..end])
        };
        entities.push(EntitySpan {
            text,
            label,
            start: i,
            end,
        });
    }

    entities.sort_by_key(|e| e.start);
    entities
}
