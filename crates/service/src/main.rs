//! dga-service — HTTP inference front end for DGA domain classification.
//!
//! Loads the trained artifact bundle once at startup, then serves
//! `GET /apply?host=<candidate>` behind a single-flight memoizing cache.
//! On startup it binds (by default) an OS-assigned port and records the
//! endpoint in a one-line discovery file for co-located tooling.

mod api;
mod cache;
mod config;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use dga_detection::{ArtifactBundle, DgaEngine};

use cache::PredictionCache;
use config::ServiceConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let config = ServiceConfig::load();

    let bundle = ArtifactBundle::load(&config.model_dir);
    let missing = bundle.missing();
    if !missing.is_empty() {
        // Keep serving so the degradation is visible at the endpoint; every
        // request fails 503 until the models are restored.
        warn!(
            ?missing,
            model_dir = %config.model_dir.display(),
            "artifact bundle incomplete; classification requests will fail"
        );
    }
    let engine = Arc::new(DgaEngine::from_bundle(bundle));

    let state = AppState {
        engine,
        cache: PredictionCache::new(),
    };
    let app = api::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    let addr = listener
        .local_addr()
        .context("failed to read bound address")?;

    let endpoint = serde_json::json!({ "url": format!("http://{addr}") });
    std::fs::write(&config.endpoint_file, endpoint.to_string())
        .with_context(|| format!("failed to write {}", config.endpoint_file.display()))?;

    info!(
        %addr,
        model_dir = %config.model_dir.display(),
        endpoint_file = %config.endpoint_file.display(),
        "dga-service started"
    );

    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}
