use crate::entropy::shannon_entropy;
use crate::ngram::CorpusScorer;
use crate::normalize::extract_domain;
use crate::types::FeatureVector;

/// Number of features in the classifier's input vector.
pub const FEATURE_COUNT: usize = 4;

/// Feature names in training order, for logging and artifact validation.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["length", "entropy", "alexa_grams", "word_grams"];

/// Computes the 4-dimensional feature vector for candidate host strings.
///
/// Owns the two fitted corpus scorers; domain extraction is stateless.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    alexa: CorpusScorer,
    dict: CorpusScorer,
}

impl FeatureExtractor {
    pub fn new(alexa: CorpusScorer, dict: CorpusScorer) -> Self {
        Self { alexa, dict }
    }

    /// Length and entropy come from the extracted registrable label; the
    /// corpus scores are computed over the raw input string. The reference
    /// feature engineering did exactly this, and the trained model expects
    /// it, so the split stays even though it looks inconsistent.
    pub fn features(&self, url: &str) -> FeatureVector {
        let domain = extract_domain(url);
        FeatureVector {
            domain_length: domain.chars().count() as f64,
            domain_entropy: shannon_entropy(&domain),
            alexa_score: self.alexa.score(url),
            dict_score: self.dict.score(url),
        }
    }

    /// Element-for-element identical to calling [`Self::features`] per item.
    pub fn features_batch<S: AsRef<str>>(&self, urls: &[S]) -> Vec<FeatureVector> {
        urls.iter().map(|u| self.features(u.as_ref())).collect()
    }
}
