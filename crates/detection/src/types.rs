use serde::{Deserialize, Serialize};

/// Classification outcome for a domain name.
///
/// The training pipeline briefly tags low-scoring Alexa exemplars as a third
/// `weird` class, but filters them out before fitting; a served model only
/// ever emits these two labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Legit,
    Dga,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legit => "legit",
            Self::Dga => "dga",
        }
    }
}

/// The four features the classifier was trained on, in training order:
/// `length, entropy, alexa_grams, word_grams`.
///
/// Length and entropy are measured on the extracted registrable label; the
/// two corpus scores are computed over the raw input string. That split is
/// what the trained model expects and must not be "fixed" here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub domain_length: f64,
    pub domain_entropy: f64,
    pub alexa_score: f64,
    pub dict_score: f64,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.domain_length,
            self.domain_entropy,
            self.alexa_score,
            self.dict_score,
        ]
    }

    /// Feature value by training-order column index.
    pub(crate) fn column(&self, index: usize) -> f64 {
        self.as_array()[index]
    }
}
