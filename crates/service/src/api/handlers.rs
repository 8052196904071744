use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use crate::cache::ClassifyError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplyParams {
    host: Option<String>,
}

/// `GET /apply?host=<candidate>` — classify one host string.
///
/// The raw query value is the cache key; no normalization happens before
/// lookup, so `google.com` and `www.google.com` are distinct entries.
pub async fn apply(
    State(state): State<AppState>,
    Query(params): Query<ApplyParams>,
) -> Response {
    let Some(host) = params.host.filter(|h| !h.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing required query parameter: host"})),
        )
            .into_response();
    };

    let engine = Arc::clone(&state.engine);
    let url = host.clone();
    match state
        .cache
        .get_or_compute(&host, move || engine.classify(&url))
        .await
    {
        Ok(label) => Json(json!({"dga": label})).into_response(),
        Err(err @ ClassifyError::Unavailable(_)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": err.to_string()})),
        )
            .into_response(),
        Err(err @ ClassifyError::Failed(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}
