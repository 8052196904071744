//! Character n-gram corpus scoring.
//!
//! A [`NgramVocabulary`] is the fitted state of the training pipeline's
//! character n-gram vectorizer (n = 3..=5, document-frequency filtered);
//! a [`CorpusScorer`] pairs it with the index-aligned log-frequency weight
//! vector and turns an arbitrary string into a scalar match score.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Shortest n-gram the reference vectorizers were fitted with.
pub const NGRAM_MIN: usize = 3;
/// Longest n-gram the reference vectorizers were fitted with.
pub const NGRAM_MAX: usize = 5;

#[derive(Debug)]
pub enum ScorerError {
    BadRange { min: usize, max: usize },
    GramOutOfRange { gram: String },
    IndexOutOfRange { gram: String, index: usize, len: usize },
    DuplicateIndex { index: usize },
    WeightMismatch { features: usize, weights: usize },
    NonFiniteWeight { index: usize, value: f64 },
}

impl fmt::Display for ScorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRange { min, max } => {
                write!(f, "invalid n-gram range: {min}..={max}")
            }
            Self::GramOutOfRange { gram } => {
                write!(f, "n-gram {gram:?} is outside the declared length range")
            }
            Self::IndexOutOfRange { gram, index, len } => {
                write!(f, "n-gram {gram:?} maps to index {index}, but only {len} features exist")
            }
            Self::DuplicateIndex { index } => {
                write!(f, "feature index {index} is assigned to more than one n-gram")
            }
            Self::WeightMismatch { features, weights } => {
                write!(f, "weight vector length {weights} does not match feature count {features}")
            }
            Self::NonFiniteWeight { index, value } => {
                write!(f, "non-finite weight at index {index}: {value}")
            }
        }
    }
}

impl std::error::Error for ScorerError {}

/// Fitted vectorizer state: the n-gram length range and the mapping from
/// each surviving n-gram to its column in the trained feature ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NgramVocabulary {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub vocabulary: HashMap<String, usize>,
}

impl NgramVocabulary {
    pub fn feature_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Structural checks: sane range, grams within it, indices dense and
    /// unique in `0..feature_count()`.
    pub fn validate(&self) -> Result<(), ScorerError> {
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            return Err(ScorerError::BadRange {
                min: self.ngram_min,
                max: self.ngram_max,
            });
        }

        let len = self.vocabulary.len();
        let mut seen = vec![false; len];
        for (gram, &index) in &self.vocabulary {
            let gram_len = gram.chars().count();
            if gram_len < self.ngram_min || gram_len > self.ngram_max {
                return Err(ScorerError::GramOutOfRange { gram: gram.clone() });
            }
            if index >= len {
                return Err(ScorerError::IndexOutOfRange {
                    gram: gram.clone(),
                    index,
                    len,
                });
            }
            if seen[index] {
                return Err(ScorerError::DuplicateIndex { index });
            }
            seen[index] = true;
        }
        Ok(())
    }
}

/// Corpus frequency scorer: a validated vocabulary plus its index-aligned
/// weight vector.
#[derive(Debug, Clone)]
pub struct CorpusScorer {
    vocabulary: NgramVocabulary,
    weights: Vec<f64>,
}

impl CorpusScorer {
    pub fn new(vocabulary: NgramVocabulary, weights: Vec<f64>) -> Result<Self, ScorerError> {
        vocabulary.validate()?;
        if weights.len() != vocabulary.feature_count() {
            return Err(ScorerError::WeightMismatch {
                features: vocabulary.feature_count(),
                weights: weights.len(),
            });
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScorerError::NonFiniteWeight { index, value });
            }
        }
        Ok(Self { vocabulary, weights })
    }

    /// Sum of `count(gram) * weights[vocabulary[gram]]` over every
    /// in-vocabulary character n-gram of the lowercased input.
    ///
    /// Occurrence counts, not binary presence: the fitted vectorizer is a
    /// count transform, so a gram appearing twice contributes twice.
    /// Out-of-vocabulary grams contribute nothing. No length normalization.
    pub fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let chars: Vec<char> = lower.chars().collect();

        let mut total = 0.0;
        let mut gram = String::with_capacity(self.vocabulary.ngram_max * 4);
        for n in self.vocabulary.ngram_min..=self.vocabulary.ngram_max {
            if chars.len() < n {
                break;
            }
            for window in chars.windows(n) {
                gram.clear();
                gram.extend(window.iter());
                if let Some(&index) = self.vocabulary.vocabulary.get(&gram) {
                    total += self.weights[index];
                }
            }
        }
        total
    }

    /// Element-for-element identical to calling [`Self::score`] per item.
    pub fn score_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<f64> {
        texts.iter().map(|t| self.score(t.as_ref())).collect()
    }
}
