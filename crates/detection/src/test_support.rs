//! Fixture bundle shared by unit, integration, and downstream service tests.
//!
//! The fixture approximates the reference training outcome on three pinned
//! inputs: `www.google.com` and `www.facebook.com` classify `legit`,
//! `www.1cb8a5f36f.com` classifies `dga`. Google n-grams seed the Alexa
//! vocabulary and Facebook n-grams the dictionary vocabulary, so both
//! scorers get exercised.

use crate::bundle::ArtifactBundle;
use crate::engine::DgaEngine;
use crate::forest::{DecisionTree, RandomForest, TreeNode};
use crate::ngram::{CorpusScorer, NgramVocabulary, NGRAM_MAX, NGRAM_MIN};
use crate::types::Label;

pub fn fixture_vocabulary(grams: &[&str]) -> NgramVocabulary {
    NgramVocabulary {
        ngram_min: NGRAM_MIN,
        ngram_max: NGRAM_MAX,
        vocabulary: grams
            .iter()
            .enumerate()
            .map(|(index, gram)| (gram.to_string(), index))
            .collect(),
    }
}

pub fn fixture_alexa_scorer() -> CorpusScorer {
    let grams = ["goo", "oog", "ogl", "gle", "goog", "oogl", "ogle"];
    let vocabulary = fixture_vocabulary(&grams);
    let weights = vec![1.0; grams.len()];
    CorpusScorer::new(vocabulary, weights).expect("fixture scorer is valid")
}

pub fn fixture_dict_scorer() -> CorpusScorer {
    let grams = ["fac", "ace", "ceb", "ebo", "boo", "ook", "face", "book"];
    let vocabulary = fixture_vocabulary(&grams);
    let weights = vec![1.0; grams.len()];
    CorpusScorer::new(vocabulary, weights).expect("fixture scorer is valid")
}

/// Three trees: two corpus-score trees (Alexa then dict, low-and-low means
/// dga) and one entropy tree, so the majority vote does real work.
pub fn fixture_forest() -> RandomForest {
    let split = |feature: usize, threshold: f64, left: usize, right: usize| TreeNode::Split {
        feature,
        threshold,
        left,
        right,
    };
    let leaf = |label: Label| TreeNode::Leaf { label };

    let corpus_tree = DecisionTree {
        nodes: vec![
            split(2, 0.5, 1, 2),
            split(3, 0.5, 3, 4),
            leaf(Label::Legit),
            leaf(Label::Dga),
            leaf(Label::Legit),
        ],
    };
    let entropy_tree = DecisionTree {
        nodes: vec![split(1, 3.0, 1, 2), leaf(Label::Legit), leaf(Label::Dga)],
    };

    let forest = RandomForest {
        model_id: "fixture-forest".to_string(),
        model_version: "1.0.0".to_string(),
        trees: vec![corpus_tree.clone(), corpus_tree, entropy_tree],
    };
    forest.validate().expect("fixture forest is valid");
    forest
}

pub fn fixture_bundle() -> ArtifactBundle {
    ArtifactBundle::from_parts(fixture_forest(), fixture_alexa_scorer(), fixture_dict_scorer())
}

pub fn fixture_engine() -> DgaEngine {
    DgaEngine::from_bundle(fixture_bundle())
}

/// JSON artifact bodies in bundle-file form, keyed by artifact name, for
/// tests that exercise the on-disk loader.
pub fn fixture_artifact_files() -> Vec<(&'static str, String)> {
    let alexa_grams = ["goo", "oog", "ogl", "gle", "goog", "oogl", "ogle"];
    let dict_grams = ["fac", "ace", "ceb", "ebo", "boo", "ook", "face", "book"];

    let alexa_vocab = serde_json::to_string(&fixture_vocabulary(&alexa_grams))
        .expect("vocabulary serializes");
    let dict_vocab =
        serde_json::to_string(&fixture_vocabulary(&dict_grams)).expect("vocabulary serializes");
    let alexa_weights =
        serde_json::to_string(&vec![1.0f64; alexa_grams.len()]).expect("weights serialize");
    let dict_weights =
        serde_json::to_string(&vec![1.0f64; dict_grams.len()]).expect("weights serialize");
    let forest = serde_json::to_string(&fixture_forest()).expect("forest serializes");

    vec![
        (crate::bundle::ARTIFACT_CLASSIFIER, forest),
        (crate::bundle::ARTIFACT_ALEXA_VOCABULARY, alexa_vocab),
        (crate::bundle::ARTIFACT_ALEXA_WEIGHTS, alexa_weights),
        (crate::bundle::ARTIFACT_DICT_VOCABULARY, dict_vocab),
        (crate::bundle::ARTIFACT_DICT_WEIGHTS, dict_weights),
    ]
}
