use axum::{extract::State, routing::post, Json, Router};
use http::{header, HeaderMap};
use serde_json::{json, Value};
use tracing::warn;

use api::event::ProviderNotification;
use api::response::ApiResponse;

use super::ok;
use crate::{error::AppError, result::Result, AppState};

/// Called by the transcoding provider, authenticated with its own shared secret
pub fn route() -> Router<AppState> {
    Router::new().route(api::path::PROVIDER_WEBHOOK, post(provider_webhook))
}

async fn provider_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(notification): Json<ProviderNotification>,
) -> Result<Json<ApiResponse<Value>>> {
    if let Some(secret) = state.config.provider.webhook_secret.as_deref() {
        let expected = format!("Bearer {}", secret);
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            warn!(channel = %notification.channel_id, "provider webhook rejected");
            return Err(AppError::AccessDenied);
        }
    }

    let event = notification.event;
    state
        .orchestrator
        .handle_provider_notification(notification)
        .await?;
    ok(json!({ "handled": event }))
}
