use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::bundle::{ArtifactBundle, ARTIFACT_CLASSIFIER};
use crate::features::FeatureExtractor;
use crate::forest::Predictor;
use crate::types::Label;

/// Raised by every inference while the trained artifact bundle is
/// incomplete. `Clone` so concurrent callers sharing one in-flight
/// computation can each receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    ModelUnavailable { artifact: &'static str },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelUnavailable { artifact } => {
                write!(f, "model unavailable: artifact {artifact} failed to load")
            }
        }
    }
}

impl std::error::Error for EngineError {}

struct EngineParts {
    features: FeatureExtractor,
    predictor: Arc<dyn Predictor>,
}

/// The inference engine: normalizer + feature extractor + classifier,
/// composed over one immutable artifact bundle. Deterministic for the
/// lifetime of that bundle and side-effect-free beyond debug logging.
pub struct DgaEngine {
    inner: Option<EngineParts>,
    missing: Vec<&'static str>,
}

impl DgaEngine {
    /// Builds the engine from a loaded bundle. An incomplete bundle yields
    /// an engine whose every call fails with [`EngineError::ModelUnavailable`];
    /// there is no lazy re-load.
    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        let missing = bundle.missing();
        match bundle.into_parts() {
            (Some(classifier), Some(alexa), Some(dict)) => Self {
                inner: Some(EngineParts {
                    features: FeatureExtractor::new(alexa, dict),
                    predictor: Arc::new(classifier),
                }),
                missing,
            },
            _ => Self {
                inner: None,
                missing,
            },
        }
    }

    /// Builds the engine around any trained predictor, for callers that
    /// load the classifier from somewhere other than the standard bundle.
    pub fn new(predictor: Arc<dyn Predictor>, features: FeatureExtractor) -> Self {
        Self {
            inner: Some(EngineParts {
                features,
                predictor,
            }),
            missing: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_some()
    }

    pub fn classify(&self, url: &str) -> Result<Label, EngineError> {
        let parts = self.parts()?;
        let vector = parts.features.features(url);
        let label = parts.predictor.predict(&vector);
        debug!(url, ?vector, label = label.as_str(), "classified");
        Ok(label)
    }

    /// Element-for-element identical to calling [`Self::classify`] per item.
    pub fn classify_batch<S: AsRef<str>>(&self, urls: &[S]) -> Result<Vec<Label>, EngineError> {
        let parts = self.parts()?;
        let vectors = parts.features.features_batch(urls);
        Ok(parts.predictor.predict_batch(&vectors))
    }

    fn parts(&self) -> Result<&EngineParts, EngineError> {
        self.inner.as_ref().ok_or(EngineError::ModelUnavailable {
            artifact: self
                .missing
                .first()
                .copied()
                .unwrap_or(ARTIFACT_CLASSIFIER),
        })
    }
}
