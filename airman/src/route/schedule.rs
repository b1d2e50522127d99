use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use api::request::AddProgram;
use api::response::ApiResponse;
use api::schedule::ProgramEntry;
use auth::claims::Claims;

use super::ok;
use crate::{result::Result, AppState};

pub fn route() -> Router<AppState> {
    Router::new()
        .route(
            "/api/channels/{id}/programs",
            get(list_programs).post(add_program),
        )
        .route("/api/channels/{id}/programs/{pid}", delete(delete_program))
}

async fn list_programs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ProgramEntry>>>> {
    state.orchestrator.authorize(id, &claims).await?;
    ok(state.orchestrator.list_programs(id).await?)
}

async fn add_program(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddProgram>,
) -> Result<Json<ApiResponse<ProgramEntry>>> {
    state.orchestrator.authorize(id, &claims).await?;
    let program = state.orchestrator.add_program(id, req).await?;
    info!(channel = %id, program = program.id, title = program.title, "program scheduled");
    ok(program)
}

async fn delete_program(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, pid)): Path<(Uuid, i32)>,
) -> Result<Json<ApiResponse<Value>>> {
    state.orchestrator.authorize(id, &claims).await?;
    state.orchestrator.delete_program(id, pid).await?;
    ok(json!({ "deleted": pid }))
}
