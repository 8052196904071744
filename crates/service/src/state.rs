use std::sync::Arc;

use dga_detection::DgaEngine;

use crate::cache::PredictionCache;

/// Shared request-handling state, explicitly constructed in `main` and
/// injected into the router. The engine is read-only after load; the cache
/// is the only mutable hot-path state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DgaEngine>,
    pub cache: PredictionCache,
}
