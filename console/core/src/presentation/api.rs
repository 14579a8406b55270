// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{sse::KeepAlive, IntoResponse, Sse},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio_stream::StreamExt;

use crate::application::build_watch::BuildWatcher;
use crate::application::deployment::{DeploymentRequest, DeploymentService};
use crate::application::env_import::EnvImportService;
use crate::domain::repository::{ClusterError, ResourceRepository};
use crate::infrastructure::manifest::ManifestFragmentBuilder;

pub struct AppState {
    pub import_service: EnvImportService,
    pub deployment_service: DeploymentService,
    pub build_watcher: BuildWatcher,
    pub repository: Arc<dyn ResourceRepository>,
}

pub fn app(repository: Arc<dyn ResourceRepository>) -> Router {
    let state = Arc::new(AppState {
        import_service: EnvImportService::new(),
        deployment_service: DeploymentService::new(repository.clone()),
        build_watcher: BuildWatcher::new(repository.clone()),
        repository,
    });

    Router::new()
        .route("/env/import", post(import_env))
        .route("/agents", post(deploy_agent))
        .route("/builds/{namespace}/{name}", get(get_build_run))
        .route("/builds/{namespace}/{name}/stream", get(stream_build))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Deserialize)]
pub struct ImportEnvRequest {
    pub content: String,
}

/// Preview an env import: the manifest fragment it would produce plus the
/// non-blocking warning list. Fatal errors block with the failing stage.
async fn import_env(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImportEnvRequest>,
) -> impl IntoResponse {
    match state.import_service.import_text(&payload.content) {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "env": ManifestFragmentBuilder::to_json(&result.env_vars),
                "warnings": result.warnings,
            })),
        ),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string(), "stage": e.stage() })),
        ),
    }
}

async fn deploy_agent(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeploymentRequest>,
) -> impl IntoResponse {
    match state.deployment_service.deploy(payload).await {
        Ok(receipt) => (StatusCode::CREATED, Json(json!(receipt))),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

async fn get_build_run(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.repository.get_build_run(&namespace, &name).await {
        Ok(status) => (StatusCode::OK, Json(json!(status))),
        Err(ClusterError::BuildRunNotFound { .. }) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Build run {namespace}/{name} not found") })),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

/// Stream build phase transitions as SSE until the build terminates or the
/// watch gives up. The stream closes when the watcher task ends.
async fn stream_build(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> impl IntoResponse {
    let (tx, rx) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        if let Err(e) = state.build_watcher.watch(&namespace, &name, tx).await {
            tracing::warn!("build watch ended: {}", e);
        }
    });

    let stream = tokio_stream::wrappers::ReceiverStream::new(rx).map(|event| {
        Ok::<_, axum::Error>(
            axum::response::sse::Event::default()
                .data(serde_json::to_string(&event).unwrap_or_default()),
        )
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
