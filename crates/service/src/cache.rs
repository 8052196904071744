//! Single-flight memoization of classification results.
//!
//! A process-lifetime memo table, not a bounded cache: the set of distinct
//! query strings is expected to stay far smaller than available memory, so
//! there is deliberately no eviction and no TTL. Adding eviction would be a
//! behavior change, not a tuning knob.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use dga_detection::{EngineError, Label};

/// Service-side classification failure. `Clone` so one in-flight outcome
/// can fan out to every waiter.
#[derive(Debug, Clone)]
pub enum ClassifyError {
    /// The artifact bundle is incomplete; retrying cannot help until the
    /// models are restored.
    Unavailable(EngineError),
    /// The classification worker was lost (panic or runtime shutdown).
    /// Not memoized; the next request for this key recomputes.
    Failed(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "{err}"),
            Self::Failed(msg) => write!(f, "classification failed: {msg}"),
        }
    }
}

impl std::error::Error for ClassifyError {}

type SharedOutcome = Result<Label, ClassifyError>;

#[derive(Clone)]
enum Slot {
    Ready(Label),
    InFlight(watch::Receiver<Option<SharedOutcome>>),
}

/// Memo table with single-flight semantics: for any key, the compute
/// closure runs at most once no matter how many callers race on it;
/// everyone else awaits the shared outcome.
#[derive(Clone, Default)]
pub struct PredictionCache {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memoized or in-flight keys.
    pub fn len(&self) -> usize {
        self.lock_slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the memoized label for `key`, or runs `compute` exactly once
    /// across all concurrent callers and shares its outcome.
    ///
    /// The computation is CPU-bound, so it runs on the blocking pool, and it
    /// is driven by a detached task: a caller disconnecting mid-request
    /// cannot orphan the in-flight slot. Successful labels are memoized
    /// forever; failures are dropped from the table so the next request
    /// retries.
    pub async fn get_or_compute<F>(&self, key: &str, compute: F) -> SharedOutcome
    where
        F: FnOnce() -> Result<Label, EngineError> + Send + 'static,
    {
        enum Claim {
            Hit(Label),
            Wait(watch::Receiver<Option<SharedOutcome>>),
            Lead(watch::Sender<Option<SharedOutcome>>, watch::Receiver<Option<SharedOutcome>>),
        }

        let claim = {
            let mut slots = self.lock_slots();
            if let Some(slot) = slots.get(key) {
                match slot {
                    Slot::Ready(label) => Claim::Hit(*label),
                    Slot::InFlight(rx) => Claim::Wait(rx.clone()),
                }
            } else {
                let (tx, rx) = watch::channel(None);
                slots.insert(key.to_string(), Slot::InFlight(rx.clone()));
                Claim::Lead(tx, rx)
            }
        };

        let mut rx = match claim {
            Claim::Hit(label) => return Ok(label),
            Claim::Wait(rx) => rx,
            Claim::Lead(tx, rx) => {
                self.spawn_flight(key.to_string(), tx, compute);
                rx
            }
        };

        loop {
            if let Some(outcome) = rx.borrow_and_update().as_ref() {
                return outcome.clone();
            }
            if rx.changed().await.is_err() {
                return Err(ClassifyError::Failed(
                    "in-flight computation dropped before publishing".to_string(),
                ));
            }
        }
    }

    fn spawn_flight<F>(&self, key: String, tx: watch::Sender<Option<SharedOutcome>>, compute: F)
    where
        F: FnOnce() -> Result<Label, EngineError> + Send + 'static,
    {
        let slots = Arc::clone(&self.slots);
        tokio::spawn(async move {
            let outcome = match tokio::task::spawn_blocking(compute).await {
                Ok(Ok(label)) => Ok(label),
                Ok(Err(err)) => Err(ClassifyError::Unavailable(err)),
                Err(err) => Err(ClassifyError::Failed(format!(
                    "classification worker failed: {err}"
                ))),
            };

            {
                let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                match &outcome {
                    Ok(label) => {
                        slots.insert(key, Slot::Ready(*label));
                    }
                    Err(_) => {
                        slots.remove(&key);
                    }
                }
            }

            let _ = tx.send(Some(outcome));
        });
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        // A poisoned lock only means a panicking thread held it; the map
        // itself is still structurally sound.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_computation() {
        let cache = PredictionCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("www.google.com", move || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Hold the flight open long enough for every caller
                        // to pile onto it.
                        std::thread::sleep(Duration::from_millis(50));
                        Ok(Label::Legit)
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), Label::Legit);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn memoized_value_skips_recomputation() {
        let cache = PredictionCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            let label = cache
                .get_or_compute("example.com", move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Label::Dga)
                })
                .await
                .unwrap();
            assert_eq!(label, Label::Dga);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_keys_compute_independently() {
        let cache = PredictionCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for key in ["a.com", "b.com"] {
            let calls = Arc::clone(&calls);
            cache
                .get_or_compute(key, move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Label::Legit)
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_memoized() {
        let cache = PredictionCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = {
            let calls = Arc::clone(&calls);
            cache
                .get_or_compute("flaky.com", move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(EngineError::ModelUnavailable {
                        artifact: "dga_model_random_forest",
                    })
                })
                .await
        };
        assert!(matches!(first, Err(ClassifyError::Unavailable(_))));
        assert!(cache.is_empty());

        let second = {
            let calls = Arc::clone(&calls);
            cache
                .get_or_compute("flaky.com", move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Label::Legit)
                })
                .await
        };
        assert_eq!(second.unwrap(), Label::Legit);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn panicking_computation_reports_failure_and_recovers() {
        let cache = PredictionCache::new();

        let first = cache
            .get_or_compute("panicky.com", || panic!("scorer indexing fault"))
            .await;
        assert!(matches!(first, Err(ClassifyError::Failed(_))));
        assert!(cache.is_empty());

        let second = cache
            .get_or_compute("panicky.com", || Ok(Label::Legit))
            .await;
        assert_eq!(second.unwrap(), Label::Legit);
    }
}
