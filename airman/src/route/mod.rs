use axum::{body::Bytes, Json, Router};
use serde::de::DeserializeOwned;

use api::response::ApiResponse;

use crate::{error::AppError, result::Result, AppState};

pub mod channel;
pub mod monitor;
pub mod schedule;
pub mod stream;
pub mod webhook;

/// Routes acting on behalf of an authenticated caller
pub fn route() -> Router<AppState> {
    Router::new()
        .merge(channel::route())
        .merge(schedule::route())
        .merge(stream::route())
        .merge(monitor::route())
}

pub(crate) fn ok<T>(data: T) -> Result<Json<ApiResponse<T>>> {
    Ok(Json(ApiResponse::ok(data)))
}

/// An empty body stands for the default payload
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(AppError::bad_request)
}
