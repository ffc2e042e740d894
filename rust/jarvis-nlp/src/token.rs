//! Annotated tokens: the only view of language the recognizer consumes.
//!
//! An [`Annotator`] turns a turn's text into a [`Doc`]: tokens carrying a
//! lemma, a part of speech and a dependency arc, plus named-entity spans over
//! those tokens. Rules, extractors and the dialogue never look at anything
//! else, so any tagger able to fill these fields can drive the assistant.
//!
//! ```text
//! "weather in Springfield"
//!
//!   0 weather      NOUN   ROOT
//!   1 in           ADP    prep  → 0
//!   2 Springfield  PROPN  pobj  → 1
//! ```

use std::fmt;

/// Part-of-speech categories, following the universal tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Auxiliary,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Numeral,
    Conjunction,
    Particle,
    Interjection,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    /// Nouns, proper nouns, pronouns and numerals: things a preposition can govern.
    pub fn is_nominal(self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun
                | PartOfSpeech::ProperNoun
                | PartOfSpeech::Pronoun
                | PartOfSpeech::Numeral
        )
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::ProperNoun => "PROPN",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Auxiliary => "AUX",
            PartOfSpeech::Adjective => "ADJ",
            PartOfSpeech::Adverb => "ADV",
            PartOfSpeech::Pronoun => "PRON",
            PartOfSpeech::Determiner => "DET",
            PartOfSpeech::Adposition => "ADP",
            PartOfSpeech::Numeral => "NUM",
            PartOfSpeech::Conjunction => "CCONJ",
            PartOfSpeech::Particle => "PART",
            PartOfSpeech::Interjection => "INTJ",
            PartOfSpeech::Punctuation => "PUNCT",
            PartOfSpeech::Other => "X",
        };
        write!(f, "{tag}")
    }
}

/// Dependency relation of a token to its head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Root,
    /// Prepositional modifier.
    Prep,
    /// Object of a preposition.
    Pobj,
    Det,
    Compound,
    Punct,
    Other,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dependency::Root => "ROOT",
            Dependency::Prep => "prep",
            Dependency::Pobj => "pobj",
            Dependency::Det => "det",
            Dependency::Compound => "compound",
            Dependency::Punct => "punct",
            Dependency::Other => "dep",
        };
        write!(f, "{label}")
    }
}

/// A single annotated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text as it appeared in the input.
    pub text: String,
    /// Lowercased base form ("is" → "be", "cities" → "city").
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub dep: Dependency,
    /// Index of the head token. The root is its own head.
    pub head: usize,
    /// Zero-based position in the token sequence.
    pub position: usize,
}

impl Token {
    /// Lowercased surface text.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    /// True for a numeral written with digits, such as `42` or `3.5`.
    pub fn is_number(&self) -> bool {
        self.text.starts_with(|c: char| c.is_ascii_digit()) && self.text.parse::<f64>().is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    /// Geopolitical entity: a city, country or region.
    Gpe,
    Person,
    Cardinal,
    Quantity,
    Percent,
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityLabel::Gpe => "GPE",
            EntityLabel::Person => "PERSON",
            EntityLabel::Cardinal => "CARDINAL",
            EntityLabel::Quantity => "QUANTITY",
            EntityLabel::Percent => "PERCENT",
        };
        write!(f, "{label}")
    }
}

/// A named entity covering tokens `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// An annotated turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doc {
    /// The raw text the annotations were produced from.
    pub text: String,
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
}

impl Doc {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The raw text, lowercased with typographic apostrophes folded.
    pub fn lower(&self) -> String {
        self.text.to_lowercase().replace('\u{2019}', "'")
    }

    /// Tokens whose head is token `i`.
    pub fn children(&self, i: usize) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(move |t| t.head == i && t.position != i)
    }

    pub fn has_lemma(&self, lemma: &str) -> bool {
        self.tokens.iter().any(|t| t.lemma == lemma)
    }

    pub fn has_any_lemma(&self, lemmas: &[&str]) -> bool {
        self.tokens.iter().any(|t| lemmas.contains(&t.lemma.as_str()))
    }

    pub fn has_number(&self) -> bool {
        self.tokens.iter().any(Token::is_number)
    }

    pub fn first_entity(&self, label: EntityLabel) -> Option<&EntitySpan> {
        self.entities.iter().find(|e| e.label == label)
    }

    /// Tokens other than punctuation.
    pub fn words(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(|t| t.pos != PartOfSpeech::Punctuation)
    }
}

/// The tagging capability the recognizer depends on.
pub trait Annotator {
    /// Tokenize, tag, parse and find entities in one pass.
    fn annotate(&self, text: &str) -> Doc;

    fn tokenize(&self, text: &str) -> Vec<Token> {
        self.annotate(text).tokens
    }

    fn entities(&self, text: &str) -> Vec<EntitySpan> {
        self.annotate(text).entities
    }
}

/// Byte offset of the first whole-word occurrence of `phrase` in `text`.
///
/// Both sides are expected to be lowercased already. A match must not be
/// glued to a letter or digit on either side, so "hi" does not match
/// inside "this".
pub fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    let is_word = |c: char| c.is_alphanumeric();
    text.match_indices(phrase).map(|(i, _)| i).find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + phrase.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    find_phrase(text, phrase).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, pos: PartOfSpeech, dep: Dependency, head: usize, position: usize) -> Token {
        Token {
            text: text.into(),
            lemma: text.to_lowercase(),
            pos,
            dep,
            head,
            position,
        }
    }

    #[test]
    fn children_follow_head_links() {
        let doc = Doc {
            text: "weather in Paris".into(),
            tokens: vec![
                token("weather", PartOfSpeech::Noun, Dependency::Root, 0, 0),
                token("in", PartOfSpeech::Adposition, Dependency::Prep, 0, 1),
                token("Paris", PartOfSpeech::ProperNoun, Dependency::Pobj, 1, 2),
            ],
            entities: vec![],
        };
        let of_root: Vec<_> = doc.children(0).map(|t| t.text.as_str()).collect();
        assert_eq!(of_root, vec!["in"]);
        let of_prep: Vec<_> = doc.children(1).map(|t| t.text.as_str()).collect();
        assert_eq!(of_prep, vec!["Paris"]);
        assert_eq!(doc.children(2).count(), 0);
    }

    #[test]
    fn numbers_need_digits() {
        let n = token("3.5", PartOfSpeech::Numeral, Dependency::Other, 0, 0);
        let w = token("five", PartOfSpeech::Numeral, Dependency::Other, 0, 0);
        let inf = token("inf", PartOfSpeech::Noun, Dependency::Other, 0, 0);
        assert!(n.is_number());
        assert!(!w.is_number());
        assert!(!inf.is_number());
    }

    #[test]
    fn phrases_match_whole_words() {
        assert!(contains_phrase("who is albert einstein", "who is"));
        assert!(!contains_phrase("this is it", "hi"));
        assert!(contains_phrase("what's 5 plus 3", "what's"));
        assert_eq!(find_phrase("open up my calculator", "open up"), Some(0));
        assert_eq!(find_phrase("please open chrome", "open"), Some(7));
        assert!(!contains_phrase("reopen it", "open"));
    }
}
