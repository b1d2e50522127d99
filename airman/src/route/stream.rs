use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use api::request::{Heartbeat, ReportError, StartStream, Transmit};
use api::response::{
    AdvanceResult, ApiResponse, FallbackResult, HeartbeatResult, StartResult, StatusView,
    StopResult, SwitchResult, TransmitResult,
};
use api::session::Session;
use auth::claims::Claims;

use super::{ok, optional_json};
use crate::{result::Result, AppState};

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/api/channels/{id}/stream/start", post(start))
        .route("/api/channels/{id}/stream/stop", post(stop))
        .route("/api/channels/{id}/stream/next", post(next))
        .route("/api/channels/{id}/stream/live", post(live))
        .route("/api/channels/{id}/stream/fallback", post(fallback))
        .route("/api/channels/{id}/stream/transmit", post(transmit))
        .route("/api/channels/{id}/stream/heartbeat", post(heartbeat))
        .route("/api/channels/{id}/stream/error", post(report_error))
        .route("/api/channels/{id}/stream/status", get(status))
}

async fn start(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<StartResult>>> {
    state.orchestrator.authorize(id, &claims).await?;
    let req: StartStream = optional_json(&body)?;
    ok(state.orchestrator.start(id, req.output_config).await?)
}

async fn stop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StopResult>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.stop(id).await?)
}

async fn next(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdvanceResult>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.advance_to_next(id).await?)
}

async fn live(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SwitchResult>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.switch_to_live(id).await?)
}

async fn fallback(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FallbackResult>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.fallback_to_playlist(id).await?)
}

async fn transmit(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<Transmit>,
) -> Result<Json<ApiResponse<TransmitResult>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.transmit(id, req).await?)
}

async fn heartbeat(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<HeartbeatResult>>> {
    state.orchestrator.authorize(id, &claims).await?;
    let req: Heartbeat = optional_json(&body)?;
    ok(state.orchestrator.heartbeat(id, req.metadata).await?)
}

async fn report_error(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReportError>,
) -> Result<Json<ApiResponse<Session>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.report_error(id, req.message).await?)
}

async fn status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StatusView>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.status(id).await?)
}
