use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use api::request::QueryLogs;
use api::response::{ApiResponse, CurrentView, LogsView, PlaylistView, ScheduleItem, StatsView};
use auth::claims::Claims;

use super::ok;
use crate::{result::Result, AppState};

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/api/channels/{id}/playlist", get(playlist))
        .route("/api/channels/{id}/current", get(current))
        .route("/api/channels/{id}/schedule", get(schedule))
        .route("/api/channels/{id}/logs", get(logs))
        .route("/api/channels/{id}/stats", get(stats))
}

async fn playlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PlaylistView>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.get_playlist(id).await?)
}

async fn current(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CurrentView>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.get_current(id).await?)
}

async fn schedule(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ScheduleItem>>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.get_schedule(id).await?)
}

async fn logs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Query(query): Query<QueryLogs>,
) -> Result<Json<ApiResponse<LogsView>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.get_logs(id, query.limit).await?)
}

async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StatsView>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.get_stats(id).await?)
}
