//! # dga-detection — DGA Domain Classification Core
//!
//! Classifies internet domain names as benign (`legit`) or algorithmically
//! generated (`dga`). Malware families use domain-generation algorithms to
//! produce large numbers of rendezvous hostnames for command-and-control;
//! those names look statistically different from names people register.
//!
//! ## Architecture
//!
//! ```text
//! url ─→ [normalize] ─→ 2LD label ─┬─→ length ──────┐
//!                                  └─→ entropy ─────┤
//! url ────────────────→ [ngram × 2] ─→ corpus match ┼─→ [forest] ─→ label
//!                        (alexa, dict)              ┘
//! ```
//!
//! The four features feed a pre-trained decision forest. All trained state
//! (forest, two vocabularies, two weight vectors) arrives as the read-only
//! [`bundle::ArtifactBundle`], produced by an offline training pipeline.

pub mod bundle;
mod engine;
mod entropy;
mod features;
mod forest;
mod ngram;
mod normalize;
mod types;

pub use bundle::{ArtifactBundle, ArtifactError};
pub use engine::{DgaEngine, EngineError};
pub use entropy::shannon_entropy;
pub use features::{FeatureExtractor, FEATURE_COUNT, FEATURE_NAMES};
pub use forest::{DecisionTree, ModelError, Predictor, RandomForest, TreeNode};
pub use ngram::{CorpusScorer, NgramVocabulary, ScorerError, NGRAM_MAX, NGRAM_MIN};
pub use normalize::extract_domain;
pub use types::{FeatureVector, Label};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(test)]
mod tests;
