//! Statistical intent classifier.
//!
//! A two-stage pipeline trained offline from a labeled pattern corpus:
//!
//! ```text
//! text → normalize (lowercase, drop punctuation)
//!      → TF-IDF over word 1- and 2-grams (smoothed idf, L2 norm)
//!      → multinomial logistic regression
//!      → argmax → label encoder → Intent
//! ```
//!
//! Training is stochastic gradient descent whose sample order is shuffled by
//! a ChaCha generator with a fixed seed, so the same corpus always yields the
//! same weights. Equal top scores resolve to the lowest encoded label, which
//! is the alphabetically first tag: deterministic, but arbitrary.
//!
//! A trained model is two JSON artifacts in a model directory:
//! [`PIPELINE_FILE`] (vectorizer and weights) and [`LABELS_FILE`] (label
//! encoder).

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::NlpError;
use crate::intent::Intent;
use crate::lexicon::split_words;

pub const PIPELINE_FILE: &str = "intent_pipeline.json";
pub const LABELS_FILE: &str = "label_encoder.json";

const SEED: u64 = 42;
const EPOCHS: usize = 200;
const LEARNING_RATE: f64 = 0.5;
const LEARNING_DECAY: f64 = 0.01;
const L2_PENALTY: f64 = 1e-4;

/// Terms are runs of two or more word characters.
static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term pattern is a valid regular expression"));

const BUNDLED_CORPUS: &str = include_str!("../corpus/training_data.json");

/// `{"intents": [{"tag": ..., "patterns": [...]}, ...]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCorpus {
    pub intents: Vec<IntentPatterns>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentPatterns {
    pub tag: String,
    pub patterns: Vec<String>,
}

impl TrainingCorpus {
    pub fn from_path(path: &Path) -> Result<Self, NlpError> {
        let json = fs::read_to_string(path).map_err(|e| NlpError::io(path, e))?;
        serde_json::from_str(&json).map_err(|e| NlpError::json(path, e))
    }

    /// The corpus shipped with this crate.
    pub fn bundled() -> Result<Self, NlpError> {
        serde_json::from_str(BUNDLED_CORPUS)
            .map_err(|e| NlpError::json("corpus/training_data.json", e))
    }

    /// Flatten into `(pattern, intent)` pairs, rejecting unknown tags.
    pub fn examples(&self) -> Result<Vec<(String, Intent)>, NlpError> {
        let mut examples = Vec::new();
        for group in &self.intents {
            let intent: Intent = group.tag.parse()?;
            for pattern in &group.patterns {
                examples.push((pattern.clone(), intent));
            }
        }
        if examples.is_empty() {
            return Err(NlpError::EmptyCorpus);
        }
        Ok(examples)
    }
}

/// Lowercase and drop punctuation tokens.
pub fn normalize(text: &str) -> String {
    split_words(&text.to_lowercase())
        .into_iter()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A sparse feature vector: `(feature index, value)` sorted by index.
pub type Features = Vec<(usize, f64)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Unigrams followed by bigrams.
    pub fn analyze(text: &str) -> Vec<String> {
        let words: Vec<&str> = TERM.find_iter(text).map(|m| m.as_str()).collect();
        let bigrams = words.windows(2).map(|pair| pair.join(" "));
        words
            .iter()
            .map(|w| w.to_string())
            .chain(bigrams)
            .collect()
    }

    pub fn fit(documents: &[String]) -> Self {
        let analyzed: Vec<BTreeSet<String>> = documents
            .iter()
            .map(|d| Self::analyze(d).into_iter().collect())
            .collect();

        let terms: BTreeSet<&String> = analyzed.iter().flatten().collect();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for terms in &analyzed {
            for term in terms {
                if let Some(&j) = vocabulary.get(term) {
                    document_frequency[j] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        TfidfVectorizer { vocabulary, idf }
    }

    pub fn transform(&self, text: &str) -> Features {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in Self::analyze(text) {
            if let Some(&j) = self.vocabulary.get(&term) {
                *counts.entry(j).or_default() += 1.0;
            }
        }

        let mut features: Features = counts
            .into_iter()
            .filter_map(|(j, tf)| self.idf.get(j).map(|idf| (j, tf * idf)))
            .collect();
        let norm = features.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut features {
                *v /= norm;
            }
        }
        features
    }

    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Every vocabulary entry must point at an idf weight.
    fn check(&self) -> Result<(), String> {
        match self.vocabulary.iter().find(|&(_, &j)| j >= self.idf.len()) {
            Some((term, j)) => Err(format!(
                "term {term:?} maps to feature {j} of {}",
                self.idf.len()
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One row per class.
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exp: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / total).collect()
}

impl LogisticRegression {
    pub fn fit(samples: &[Features], labels: &[usize], classes: usize, features: usize) -> Self {
        let mut model = LogisticRegression {
            weights: vec![vec![0.0; features]; classes],
            bias: vec![0.0; classes],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        let mut order: Vec<usize> = (0..samples.len()).collect();

        for epoch in 0..EPOCHS {
            order.shuffle(&mut rng);
            let rate = LEARNING_RATE / (1.0 + epoch as f64 * LEARNING_DECAY);

            for &i in &order {
                let probabilities = softmax(&model.scores(&samples[i]));
                for (k, p) in probabilities.into_iter().enumerate() {
                    let gradient = p - if labels[i] == k { 1.0 } else { 0.0 };
                    for &(j, x) in &samples[i] {
                        model.weights[k][j] -= rate * gradient * x;
                    }
                    model.bias[k] -= rate * gradient;
                }
            }

            let decay = 1.0 - rate * L2_PENALTY;
            for row in &mut model.weights {
                for w in row.iter_mut() {
                    *w *= decay;
                }
            }
        }

        model
    }

    pub fn scores(&self, x: &[(usize, f64)]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| b + x.iter().map(|&(j, v)| row.get(j).copied().unwrap_or(0.0) * v).sum::<f64>())
            .collect()
    }

    /// Index of the highest score; the first one wins a tie.
    pub fn predict(&self, x: &[(usize, f64)]) -> usize {
        let scores = self.scores(x);
        let mut best = 0;
        for (k, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = k;
            }
        }
        best
    }

    pub fn classes(&self) -> usize {
        self.bias.len()
    }

    /// One bias per weight row, and every row `features` wide.
    fn check(&self, features: usize) -> Result<(), String> {
        if self.weights.len() != self.bias.len() {
            return Err(format!(
                "{} weight rows but {} biases",
                self.weights.len(),
                self.bias.len()
            ));
        }
        match self.weights.iter().position(|row| row.len() != features) {
            Some(k) => Err(format!(
                "weight row {k} has {} columns, expected {features}",
                self.weights[k].len()
            )),
            None => Ok(()),
        }
    }
}

/// Maps intents to contiguous class indices, in tag order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<Intent>,
}

impl LabelEncoder {
    pub fn fit(intents: impl IntoIterator<Item = Intent>) -> Self {
        let mut classes: Vec<Intent> = intents.into_iter().collect();
        classes.sort_by_key(|i| i.tag());
        classes.dedup();
        LabelEncoder { classes }
    }

    pub fn encode(&self, intent: Intent) -> Option<usize> {
        self.classes.iter().position(|&c| c == intent)
    }

    pub fn decode(&self, index: usize) -> Option<Intent> {
        self.classes.get(index).copied()
    }

    pub fn classes(&self) -> &[Intent] {
        &self.classes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPipeline {
    pub vectorizer: TfidfVectorizer,
    pub classifier: LogisticRegression,
}

impl IntentPipeline {
    fn check(&self) -> Result<(), String> {
        self.vectorizer.check()?;
        self.classifier.check(self.vectorizer.len())
    }
}

/// A trained pipeline together with its label encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentClassifier {
    pipeline: IntentPipeline,
    labels: LabelEncoder,
}

impl IntentClassifier {
    pub fn train(corpus: &TrainingCorpus) -> Result<Self, NlpError> {
        let examples = corpus.examples()?;
        let labels = LabelEncoder::fit(examples.iter().map(|(_, intent)| *intent));

        let documents: Vec<String> = examples.iter().map(|(p, _)| normalize(p)).collect();
        let vectorizer = TfidfVectorizer::fit(&documents);
        let samples: Vec<Features> = documents.iter().map(|d| vectorizer.transform(d)).collect();
        let targets: Vec<usize> = examples
            .iter()
            .map(|(_, intent)| labels.encode(*intent).unwrap_or_default())
            .collect();

        let classifier =
            LogisticRegression::fit(&samples, &targets, labels.classes().len(), vectorizer.len());

        tracing::info!(
            examples = samples.len(),
            classes = labels.classes().len(),
            features = vectorizer.len(),
            "trained intent classifier"
        );

        Ok(IntentClassifier {
            pipeline: IntentPipeline {
                vectorizer,
                classifier,
            },
            labels,
        })
    }

    pub fn predict(&self, text: &str) -> Intent {
        let features = self.pipeline.vectorizer.transform(&normalize(text));
        let index = self.pipeline.classifier.predict(&features);
        self.labels.decode(index).unwrap_or(Intent::Unknown)
    }

    pub fn labels(&self) -> &[Intent] {
        self.labels.classes()
    }

    pub fn save(&self, dir: &Path) -> Result<(), NlpError> {
        fs::create_dir_all(dir).map_err(|e| NlpError::io(dir, e))?;
        write_json(&dir.join(PIPELINE_FILE), &self.pipeline)?;
        write_json(&dir.join(LABELS_FILE), &self.labels)?;
        tracing::info!(model_dir = %dir.display(), "saved intent model");
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self, NlpError> {
        let pipeline: IntentPipeline = read_json(&dir.join(PIPELINE_FILE))?;
        let labels: LabelEncoder = read_json(&dir.join(LABELS_FILE))?;

        let corrupt = |reason: String| NlpError::CorruptModel {
            path: dir.to_path_buf(),
            reason,
        };
        pipeline.check().map_err(corrupt)?;

        let classes = pipeline.classifier.classes();
        if classes != labels.classes().len() {
            return Err(corrupt(format!(
                "{classes} weight rows but {} labels",
                labels.classes().len()
            )));
        }

        tracing::info!(model_dir = %dir.display(), classes, "loaded intent model");
        Ok(IntentClassifier { pipeline, labels })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), NlpError> {
    let json = serde_json::to_string(value).map_err(NlpError::Encode)?;
    fs::write(path, json).map_err(|e| NlpError::io(path, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, NlpError> {
    let json = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => NlpError::MissingModel {
            path: path.to_path_buf(),
        },
        _ => NlpError::io(path, e),
    })?;
    serde_json::from_str(&json).map_err(|e| NlpError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn trained() -> IntentClassifier {
        IntentClassifier::train(&TrainingCorpus::bundled().unwrap()).unwrap()
    }

    #[test]
    fn normalize_drops_punctuation() {
        assert_eq!(normalize("What's the time?"), "what 's the time");
        assert_eq!(normalize("Hey, JARVIS!"), "hey jarvis");
    }

    #[test]
    fn analyze_emits_unigrams_then_bigrams() {
        assert_eq!(
            TfidfVectorizer::analyze("what is a time"),
            vec!["what", "is", "time", "what is", "is time"]
        );
    }

    #[test]
    fn idf_is_smoothed_and_rows_are_unit_length() {
        let docs = vec!["hello world".to_string(), "hello there".to_string()];
        let vectorizer = TfidfVectorizer::fit(&docs);
        assert_eq!(vectorizer.len(), 5);

        let hello = vectorizer.vocabulary["hello"];
        let world = vectorizer.vocabulary["world"];
        assert!((vectorizer.idf[hello] - 1.0).abs() < 1e-12);
        assert!((vectorizer.idf[world] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);

        let row = vectorizer.transform("hello world");
        let norm: f64 = row.iter().map(|(_, v)| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(vectorizer.transform("unseen words").is_empty());
    }

    #[test]
    fn label_encoder_sorts_tags() {
        let labels = LabelEncoder::fit([Intent::SetVolume, Intent::Calculate, Intent::Greet, Intent::Calculate]);
        assert_eq!(
            labels.classes(),
            &[Intent::Calculate, Intent::Greet, Intent::SetVolume]
        );
        assert_eq!(labels.encode(Intent::Greet), Some(1));
        assert_eq!(labels.decode(2), Some(Intent::SetVolume));
        assert_eq!(labels.encode(Intent::Exit), None);
    }

    #[test]
    fn ties_go_to_the_first_label() {
        let model = LogisticRegression {
            weights: vec![vec![0.0], vec![0.0], vec![0.0]],
            bias: vec![0.0, 0.5, 0.5],
        };
        assert_eq!(model.predict(&[]), 1);
    }

    #[test]
    fn predicts_training_patterns() {
        let classifier = trained();
        let cases = [
            ("Hey Jarvis", Intent::Greet),
            ("what's the time", Intent::GetTime),
            ("weather in Mumbai", Intent::GetWeather),
            ("open up my calculator", Intent::OpenTarget),
            ("who is shah rukh khan", Intent::SearchWikipedia),
            ("5 times 10", Intent::Calculate),
            ("turn the sound down", Intent::SetVolume),
            ("that's all for now Jarvis", Intent::Exit),
        ];
        for (text, expected) in cases {
            assert_eq!(classifier.predict(text), expected, "{text:?}");
        }
    }

    #[test]
    fn training_is_reproducible() {
        assert_eq!(trained(), trained());
    }

    #[test]
    fn save_and_load_round_trip() -> TestResult {
        let dir = tempfile::tempdir()?;
        let classifier = trained();
        classifier.save(dir.path())?;

        assert!(dir.path().join(PIPELINE_FILE).exists());
        assert!(dir.path().join(LABELS_FILE).exists());

        let loaded = IntentClassifier::load(dir.path())?;
        assert_eq!(loaded.labels(), classifier.labels());
        for text in ["hello", "close chrome", "set volume to 50"] {
            assert_eq!(loaded.predict(text), classifier.predict(text));
        }
        Ok(())
    }

    #[test]
    fn missing_artifacts_are_reported() -> TestResult {
        let dir = tempfile::tempdir()?;
        let error = IntentClassifier::load(dir.path()).unwrap_err();
        assert!(matches!(error, NlpError::MissingModel { .. }));
        Ok(())
    }

    #[test]
    fn mismatched_artifacts_are_corrupt() -> TestResult {
        let dir = tempfile::tempdir()?;
        let classifier = trained();

        let mut truncated_idf = classifier.clone();
        truncated_idf.pipeline.vectorizer.idf.clear();
        truncated_idf.save(dir.path())?;
        let error = IntentClassifier::load(dir.path()).unwrap_err();
        assert!(matches!(error, NlpError::CorruptModel { .. }), "{error}");

        let mut narrow_row = classifier.clone();
        narrow_row.pipeline.classifier.weights[0].pop();
        narrow_row.save(dir.path())?;
        let error = IntentClassifier::load(dir.path()).unwrap_err();
        assert!(matches!(error, NlpError::CorruptModel { .. }), "{error}");

        let mut extra_bias = classifier;
        extra_bias.pipeline.classifier.bias.push(0.0);
        extra_bias.save(dir.path())?;
        let error = IntentClassifier::load(dir.path()).unwrap_err();
        assert!(matches!(error, NlpError::CorruptModel { .. }), "{error}");
        Ok(())
    }

    #[test]
    fn corpus_validation() {
        let unknown = TrainingCorpus {
            intents: vec![IntentPatterns {
                tag: "get_news".into(),
                patterns: vec!["news please".into()],
            }],
        };
        assert!(matches!(
            IntentClassifier::train(&unknown),
            Err(NlpError::UnknownIntent { .. })
        ));

        let empty = TrainingCorpus { intents: vec![] };
        assert!(matches!(
            IntentClassifier::train(&empty),
            Err(NlpError::EmptyCorpus)
        ));
    }
}
