//! TF-IDF features with a multinomial naive Bayes classifier.
//!
//! Tokens are runs of two or more word characters taken from the lower-cased,
//! ASCII-folded text. English stop words are dropped before 1-3 word n-grams
//! are formed. IDF is smoothed (`ln((1 + n) / (1 + df)) + 1`) and every
//! document vector is L2-normalised.

use super::classifier::ClassifierError;
use super::entities::Intent;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Additive smoothing for the per-class feature distributions
pub const SMOOTHING_ALPHA: f64 = 0.1;

const MAX_NGRAM: usize = 3;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "almost", "also", "am", "an",
        "and", "any", "are", "around", "as", "at", "be", "because", "been", "before", "being",
        "below", "between", "both", "but", "by", "can", "cannot", "could", "did", "do", "does",
        "doing", "done", "down", "during", "each", "either", "else", "enough", "etc", "ever",
        "every", "few", "for", "from", "further", "get", "give", "had", "has", "have", "having",
        "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i",
        "ie", "if", "in", "into", "is", "it", "its", "itself", "just", "last", "least", "less",
        "many", "may", "me", "might", "more", "most", "much", "must", "my", "myself", "next",
        "no", "nor", "not", "now", "of", "off", "often", "on", "once", "one", "only", "or",
        "other", "our", "ours", "ourselves", "out", "over", "own", "per", "please", "rather",
        "same", "see", "seem", "several", "she", "should", "since", "so", "some", "still",
        "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "though", "through", "thus", "to", "too", "under",
        "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
        "whatever", "when", "where", "whether", "which", "while", "who", "whom", "whose",
        "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
        "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Fold to lower-case ASCII, dropping characters without an ASCII form.
fn fold(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' => Some('e'),
            'í' | 'ì' | 'î' | 'ï' | 'Í' => Some('i'),
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ö' => Some('o'),
            'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ü' => Some('u'),
            'ñ' | 'Ñ' => Some('n'),
            'ç' | 'Ç' => Some('c'),
            c if c.is_ascii() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}

/// Split text into the n-gram terms the vectorizer counts.
pub fn analyze(text: &str) -> Vec<String> {
    let folded = fold(text);
    let words: Vec<&str> = TOKEN
        .find_iter(&folded)
        .map(|m| m.as_str())
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();

    let mut terms = Vec::new();
    for n in 1..=MAX_NGRAM {
        for window in words.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

/// Fitted text model: vocabulary, IDF weights and per-class log-probabilities.
#[derive(Debug, Clone)]
pub struct TextModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    classes: Vec<Intent>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl TextModel {
    /// Fit the model on labelled examples.
    pub fn fit(examples: &[(Intent, &[&str])]) -> Result<Self, ClassifierError> {
        let labelled: Vec<(Intent, Vec<String>)> = examples
            .iter()
            .flat_map(|(intent, texts)| texts.iter().map(move |t| (*intent, analyze(t))))
            .collect();
        if labelled.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let mut classes: Vec<Intent> = Vec::new();
        for (intent, _) in &labelled {
            if !classes.contains(intent) {
                classes.push(*intent);
            }
        }
        if classes.len() < 2 {
            return Err(ClassifierError::TooFewClasses(classes.len()));
        }

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        for (_, terms) in &labelled {
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                let next = vocabulary.len();
                let index = *vocabulary.entry(term.clone()).or_insert(next);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                document_frequency[index] += 1;
            }
        }
        if vocabulary.is_empty() {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let n_docs = labelled.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut model = Self {
            vocabulary,
            idf,
            classes,
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
        };

        let n_features = model.idf.len();
        let mut feature_count = vec![vec![0.0; n_features]; model.classes.len()];
        let mut class_count = vec![0usize; model.classes.len()];
        for (intent, terms) in &labelled {
            let class = model.class_index(*intent);
            class_count[class] += 1;
            for (index, weight) in model.vectorize(terms) {
                feature_count[class][index] += weight;
            }
        }

        model.class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / n_docs).ln())
            .collect();
        model.feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + SMOOTHING_ALPHA * n_features as f64;
                counts
                    .iter()
                    .map(|c| ((c + SMOOTHING_ALPHA) / total).ln())
                    .collect()
            })
            .collect();

        Ok(model)
    }

    fn class_index(&self, intent: Intent) -> usize {
        self.classes
            .iter()
            .position(|c| *c == intent)
            .unwrap_or_default()
    }

    /// Sparse, L2-normalised TF-IDF vector of already analyzed terms.
    fn vectorize(&self, terms: &[String]) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_default() += 1.0;
            }
        }
        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut weighted {
                *w /= norm;
            }
        }
        weighted.sort_by_key(|(index, _)| *index);
        weighted
    }

    /// Posterior probability of every class, in training order.
    ///
    /// Fails with [`ClassifierError::NonFiniteScores`] if the arithmetic
    /// produced a NaN or infinity.
    pub fn predict_proba(&self, text: &str) -> Result<Vec<(Intent, f64)>, ClassifierError> {
        let features = self.vectorize(&analyze(text));
        let joint: Vec<f64> = self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| {
                prior + features.iter().map(|(i, w)| w * log_prob[*i]).sum::<f64>()
            })
            .collect();

        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = joint.iter().map(|j| (j - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        let probabilities: Vec<(Intent, f64)> = self
            .classes
            .iter()
            .zip(exp)
            .map(|(intent, e)| (*intent, e / total))
            .collect();

        if probabilities.iter().all(|(_, p)| p.is_finite()) {
            Ok(probabilities)
        } else {
            Err(ClassifierError::NonFiniteScores)
        }
    }

    /// Arg-max class and its probability. The earlier class wins a tie.
    pub fn predict(&self, text: &str) -> Result<(Intent, f64), ClassifierError> {
        let probabilities = self.predict_proba(text)?;
        let mut best = probabilities[0];
        for candidate in probabilities.into_iter().skip(1) {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        Ok(best)
    }

    /// Number of distinct terms learned
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}
