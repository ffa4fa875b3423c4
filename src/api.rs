use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::error::StagehandError;
use crate::scheduler::JobScheduler;

#[derive(Clone)]
pub struct ApiState {
    pub scheduler: Arc<JobScheduler>,
}

#[derive(Serialize)]
struct SubmitResponse {
    job_id: Uuid,
}

#[derive(Serialize)]
struct JobQueryResponse {
    status: String,
    output: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the API router. `prefix` optionally nests every route under an
/// extra path segment.
pub fn router(state: ApiState, prefix: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/{module}/{stage}", post(submit_job_handler))
        .route("/api/job/{id}", get(query_job_handler))
        .layer(cors)
        .with_state(state);

    if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    }
}

pub async fn run_api(
    addr: SocketAddr,
    state: ApiState,
    prefix: &str,
    cancel: CancellationToken,
) -> crate::error::Result<()> {
    let app = router(state, prefix);

    tracing::info!(addr = %addr, "Starting API server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;
    Ok(())
}

async fn submit_job_handler(
    State(state): State<ApiState>,
    Path((module, stage)): Path<(String, String)>,
) -> Response {
    match state.scheduler.create_job(&module, &stage).await {
        Ok(job_id) => (StatusCode::ACCEPTED, Json(SubmitResponse { job_id })).into_response(),
        Err(e @ (StagehandError::InvalidTask { .. } | StagehandError::RunnerPrep(_))) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e @ StagehandError::PoolClosed) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(module, stage, error = %e, "Job submission failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn query_job_handler(State(state): State<ApiState>, Path(id): Path<Uuid>) -> Response {
    match state.scheduler.job_status(&id).await {
        Ok(Some(status)) => {
            let output = state.scheduler.job_output(&id).await.unwrap_or_default();
            (
                StatusCode::OK,
                Json(JobQueryResponse {
                    status: status.to_string(),
                    output,
                }),
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: StagehandError::JobNotFound(id).to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(job_id = %id, error = %e, "Job status lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
