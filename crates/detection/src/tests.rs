//! End-to-end tests over the fixture bundle, plus bundle-loading behavior
//! against real files.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::bundle::{ArtifactBundle, ARTIFACT_CLASSIFIER, ARTIFACT_DICT_VOCABULARY};
use crate::engine::EngineError;
use crate::test_support::{fixture_artifact_files, fixture_engine};
use crate::types::Label;

fn scratch_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "dga-detection-{tag}-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn classifies_reference_domains() {
    let engine = fixture_engine();
    assert_eq!(engine.classify("www.google.com").unwrap(), Label::Legit);
    assert_eq!(engine.classify("www.facebook.com").unwrap(), Label::Legit);
    assert_eq!(engine.classify("www.1cb8a5f36f.com").unwrap(), Label::Dga);
}

#[test]
fn classification_is_deterministic() {
    let engine = fixture_engine();
    let first = engine.classify("www.google.com").unwrap();
    for _ in 0..10 {
        assert_eq!(engine.classify("www.google.com").unwrap(), first);
    }
}

#[test]
fn short_domain_classifies_without_error() {
    // Domains of length <= 6 were excluded from training; the label is
    // unspecified but the call must succeed.
    let engine = fixture_engine();
    assert!(engine.classify("t.co").is_ok());
    assert!(engine.classify("a.io").is_ok());
}

#[test]
fn batch_matches_single() {
    let engine = fixture_engine();
    let urls = ["www.google.com", "www.1cb8a5f36f.com", "www.facebook.com"];
    let batch = engine.classify_batch(&urls).unwrap();
    for (url, label) in urls.iter().zip(batch) {
        assert_eq!(label, engine.classify(url).unwrap());
    }
}

#[test]
fn bundle_round_trips_through_files() {
    let dir = scratch_dir("roundtrip");
    for (name, body) in fixture_artifact_files() {
        std::fs::write(dir.join(format!("{name}.json")), body).expect("write artifact");
    }

    let bundle = ArtifactBundle::load(&dir);
    assert!(bundle.is_complete(), "missing: {:?}", bundle.missing());

    let engine = crate::engine::DgaEngine::from_bundle(bundle);
    assert_eq!(engine.classify("www.google.com").unwrap(), Label::Legit);
    assert_eq!(engine.classify("www.1cb8a5f36f.com").unwrap(), Label::Dga);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn empty_model_dir_degrades_to_unavailable() {
    let dir = scratch_dir("empty");
    let bundle = ArtifactBundle::load(&dir);
    assert!(!bundle.is_complete());
    assert_eq!(bundle.missing().len(), 3);

    let engine = crate::engine::DgaEngine::from_bundle(bundle);
    assert!(!engine.is_ready());
    assert!(matches!(
        engine.classify("www.google.com"),
        Err(EngineError::ModelUnavailable { .. })
    ));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn corrupt_artifact_degrades_only_its_slot() {
    let dir = scratch_dir("corrupt");
    for (name, body) in fixture_artifact_files() {
        let body = if name == ARTIFACT_DICT_VOCABULARY {
            "{not json".to_string()
        } else {
            body
        };
        std::fs::write(dir.join(format!("{name}.json")), body).expect("write artifact");
    }

    let bundle = ArtifactBundle::load(&dir);
    let missing = bundle.missing();
    assert_eq!(missing, vec![ARTIFACT_DICT_VOCABULARY]);
    assert!(!missing.contains(&ARTIFACT_CLASSIFIER));

    // Never silently partial: the engine refuses to classify.
    let engine = crate::engine::DgaEngine::from_bundle(bundle);
    assert!(matches!(
        engine.classify("www.google.com"),
        Err(EngineError::ModelUnavailable {
            artifact: ARTIFACT_DICT_VOCABULARY
        })
    ));

    let _ = std::fs::remove_dir_all(dir);
}
