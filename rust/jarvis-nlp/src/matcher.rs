//! One capability, two implementations: deciding the intent of a turn.
//!
//! [`RuleMatcher`] runs the ordered cascade in [`crate::rules`];
//! [`ClassifierMatcher`] asks the trained model and then fills slots with the
//! same extractors. Which one runs is a configuration choice
//! ([`MatcherKind`]), not a code path the caller picks.

use std::path::Path;

use crate::classifier::IntentClassifier;
use crate::config::{AssistantConfig, MatcherKind};
use crate::extract;
use crate::intent::{Entities, Intent};
use crate::rules;
use crate::token::Doc;

/// The outcome of recognizing one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub intent: Intent,
    pub entities: Entities,
}

impl Recognition {
    pub fn new(intent: Intent) -> Self {
        Recognition {
            intent,
            entities: Entities::new(),
        }
    }
}

pub trait IntentMatcher {
    /// Decide exactly one intent for an annotated turn. Never fails.
    fn recognize(&self, doc: &Doc) -> Recognition;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleMatcher;

impl IntentMatcher for RuleMatcher {
    fn recognize(&self, doc: &Doc) -> Recognition {
        rules::recognize(doc)
    }
}

/// Classifier-backed matcher. Without a model every turn is
/// [`Intent::ModelError`].
#[derive(Debug, Clone, Default)]
pub struct ClassifierMatcher {
    classifier: Option<IntentClassifier>,
}

impl ClassifierMatcher {
    pub fn new(classifier: IntentClassifier) -> Self {
        ClassifierMatcher {
            classifier: Some(classifier),
        }
    }

    /// Load the model from `model_dir`. A load failure is logged and leaves
    /// the matcher unavailable rather than failing.
    pub fn load(model_dir: &Path) -> Self {
        match IntentClassifier::load(model_dir) {
            Ok(classifier) => Self::new(classifier),
            Err(error) => {
                tracing::error!(%error, model_dir = %model_dir.display(), "intent model unavailable");
                ClassifierMatcher { classifier: None }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.classifier.is_some()
    }
}

impl IntentMatcher for ClassifierMatcher {
    fn recognize(&self, doc: &Doc) -> Recognition {
        let Some(classifier) = &self.classifier else {
            return Recognition::new(Intent::ModelError);
        };
        let intent = classifier.predict(&doc.text);
        Recognition {
            intent,
            entities: extract::extract(intent, doc),
        }
    }
}

/// Build the matcher a configuration selects.
pub fn from_config(config: &AssistantConfig) -> Box<dyn IntentMatcher> {
    match config.matcher {
        MatcherKind::Rules => Box::new(RuleMatcher),
        MatcherKind::Classifier => Box::new(ClassifierMatcher::load(&config.model_dir)),
    }
}
