use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use api::request::{CreateChannel, RegisterAsset};
use api::response::ApiResponse;
use api::schedule::{Channel, VideoAsset};
use auth::claims::Claims;

use super::ok;
use crate::{result::Result, AppState};

pub fn route() -> Router<AppState> {
    Router::new()
        .route(api::path::CHANNELS, post(create_channel))
        .route("/api/channels/{id}", get(get_channel))
        .route(api::path::ASSETS, post(register_asset))
}

async fn create_channel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateChannel>,
) -> Result<Json<ApiResponse<Channel>>> {
    ok(state.orchestrator.create_channel(&claims, req).await?)
}

async fn get_channel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Channel>>> {
    ok(state.orchestrator.get_channel(id, &claims).await?)
}

async fn register_asset(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RegisterAsset>,
) -> Result<Json<ApiResponse<VideoAsset>>> {
    ok(state.orchestrator.register_asset(&claims, req).await?)
}
