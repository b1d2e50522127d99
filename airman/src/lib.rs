use std::{future::Future, sync::Arc};

use axum::{body::Body, extract::Request, Router};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer, trace::TraceLayer, validate_request::ValidateRequestHeaderLayer,
};
use tracing::{error, info, info_span};

use auth::ManyValidate;

use crate::config::Config;
use crate::orchestrator::Orchestrator;
use crate::provider::cloud::CloudTranscoder;
use crate::service::database::DatabaseService;

pub mod config;
pub mod entity;
pub mod error;
pub mod hook;
pub mod lock;
pub mod r#macro;
pub mod migration;
pub mod orchestrator;
pub mod provider;
pub mod resolver;
pub mod result;
pub mod route;
pub mod service;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Orchestrator,
}

/// Full HTTP surface. The provider webhook sits outside the caller auth layer.
pub fn app(state: AppState) -> Router {
    let cfg = &state.config;
    let auth_layer = ValidateRequestHeaderLayer::custom(ManyValidate::<Body>::new(
        cfg.auth.secret.clone(),
        cfg.auth.token_map(),
    ));
    let cors = if cfg.http.cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .merge(route::route().layer(auth_layer))
        .merge(route::webhook::route())
        .layer(cors)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let span = info_span!(
                    "http_request",
                    uri = ?request.uri(),
                    method = ?request.method(),
                    span_id = tracing::field::Empty,
                );
                span.record(
                    "span_id",
                    span.id().unwrap_or(tracing::Id::from_u64(42)).into_u64(),
                );
                span
            }),
        )
}

pub async fn serve<F>(cfg: Config, listener: TcpListener, signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    match listener.local_addr() {
        Ok(addr) => info!("Server listening on {}", addr),
        Err(e) => error!("listener address unavailable: {e}"),
    }

    let database = DatabaseService::new(&cfg.database).await?;
    let transcoder = CloudTranscoder::new(&cfg.provider)?;
    info!(api_url = cfg.provider.api_url, "transcoding provider configured");

    let orchestrator = Orchestrator::new(
        database.get_connection().clone(),
        Arc::new(transcoder),
        &cfg,
    );
    let app = app(AppState {
        config: cfg,
        orchestrator,
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await
        .unwrap_or_else(|e| error!("Application error: {e}"));
    Ok(())
}
