//! Trained artifact bundle loading.
//!
//! Five JSON artifacts, named after the reference training pipeline's
//! outputs, loaded once at startup and shared read-only afterwards. Loading
//! is fail-soft per artifact: a missing or corrupt file empties that slot
//! and is logged, but never aborts the other loads. An incomplete bundle
//! makes every inference fail fast; it never serves partial results.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::forest::{ModelError, RandomForest};
use crate::ngram::{CorpusScorer, NgramVocabulary, ScorerError};

pub const ARTIFACT_CLASSIFIER: &str = "dga_model_random_forest";
pub const ARTIFACT_ALEXA_VOCABULARY: &str = "dga_model_alexa_vectorizor";
pub const ARTIFACT_ALEXA_WEIGHTS: &str = "dga_model_alexa_counts";
pub const ARTIFACT_DICT_VOCABULARY: &str = "dga_model_dict_vectorizor";
pub const ARTIFACT_DICT_WEIGHTS: &str = "dga_model_dict_counts";

const ARTIFACT_EXT: &str = "json";

#[derive(Debug)]
pub enum ArtifactError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Model(ModelError),
    Scorer(ScorerError),
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Model(e) => write!(f, "model error: {e}"),
            Self::Scorer(e) => write!(f, "scorer error: {e}"),
        }
    }
}

impl std::error::Error for ArtifactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::Scorer(e) => Some(e),
        }
    }
}

/// The five trained artifacts, folded into three usable slots: the
/// classifier and one scorer per corpus (vocabulary + aligned weights).
pub struct ArtifactBundle {
    classifier: Option<RandomForest>,
    alexa: Option<CorpusScorer>,
    dict: Option<CorpusScorer>,
}

impl ArtifactBundle {
    /// Loads every artifact from `dir`, fail-soft per artifact.
    pub fn load(dir: &Path) -> Self {
        let classifier = match RandomForest::from_file(&artifact_path(dir, ARTIFACT_CLASSIFIER))
            .map_err(ArtifactError::Model)
        {
            Ok(forest) => Some(forest),
            Err(err) => {
                warn!(artifact = ARTIFACT_CLASSIFIER, error = %err, "failed to load artifact");
                None
            }
        };

        let alexa = load_scorer(dir, ARTIFACT_ALEXA_VOCABULARY, ARTIFACT_ALEXA_WEIGHTS);
        let dict = load_scorer(dir, ARTIFACT_DICT_VOCABULARY, ARTIFACT_DICT_WEIGHTS);

        Self {
            classifier,
            alexa,
            dict,
        }
    }

    /// Programmatic assembly, for embedding and tests.
    pub fn from_parts(classifier: RandomForest, alexa: CorpusScorer, dict: CorpusScorer) -> Self {
        Self {
            classifier: Some(classifier),
            alexa: Some(alexa),
            dict: Some(dict),
        }
    }

    /// Names of the logical slots that failed to load.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.classifier.is_none() {
            missing.push(ARTIFACT_CLASSIFIER);
        }
        if self.alexa.is_none() {
            missing.push(ARTIFACT_ALEXA_VOCABULARY);
        }
        if self.dict.is_none() {
            missing.push(ARTIFACT_DICT_VOCABULARY);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.classifier.is_some() && self.alexa.is_some() && self.dict.is_some()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Option<RandomForest>,
        Option<CorpusScorer>,
        Option<CorpusScorer>,
    ) {
        (self.classifier, self.alexa, self.dict)
    }
}

fn artifact_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{ARTIFACT_EXT}"))
}

fn load_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(artifact_path(dir, name)).map_err(ArtifactError::Io)?;
    serde_json::from_str(&raw).map_err(ArtifactError::Parse)
}

/// A scorer is usable only when both halves of its pair load and the weight
/// alignment invariant holds.
fn load_scorer(dir: &Path, vocab_name: &str, weights_name: &str) -> Option<CorpusScorer> {
    let vocabulary = match load_json::<NgramVocabulary>(dir, vocab_name) {
        Ok(v) => v,
        Err(err) => {
            warn!(artifact = vocab_name, error = %err, "failed to load artifact");
            return None;
        }
    };
    let weights = match load_json::<Vec<f64>>(dir, weights_name) {
        Ok(w) => w,
        Err(err) => {
            warn!(artifact = weights_name, error = %err, "failed to load artifact");
            return None;
        }
    };
    match CorpusScorer::new(vocabulary, weights) {
        Ok(scorer) => Some(scorer),
        Err(err) => {
            warn!(
                artifact = vocab_name,
                error = %ArtifactError::Scorer(err),
                "artifact pair failed validation"
            );
            None
        }
    }
}
