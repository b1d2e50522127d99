use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use api::provider::{
    ProviderErrorBody, ProviderStatus, StartRequest, StartResponse, StopRequest,
    TransmitRequest, TransmitResponse,
};

use super::Transcoder;
use crate::config::Provider as ProviderConfig;

/// HTTP client for the cloud transcoding API
#[derive(Clone, Debug)]
pub struct CloudTranscoder {
    api_url: String,
    api_key: String,
    stream_base_url: Option<String>,
    client: Client,
}

impl CloudTranscoder {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout))
            .timeout(Duration::from_millis(cfg.timeout))
            .build()?;
        Ok(Self {
            api_url: cfg.api_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            stream_base_url: cfg.stream_base_url.clone(),
            client,
        })
    }

    fn request(&self, method: Method, channel_id: Uuid, action: &str) -> RequestBuilder {
        let url = format!("{}/v1/channels/{}/{}", self.api_url, channel_id, action);
        let builder = self.client.request(method, url);
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }

    /// Falls back to `{stream_base_url}/{output_path}/index.m3u8` when the provider omits it
    fn hls_fallback(&self, hls_url: String, output_path: &str) -> String {
        match (&self.stream_base_url, hls_url.is_empty()) {
            (Some(base), true) => format!(
                "{}/{}/index.m3u8",
                base.trim_end_matches('/'),
                output_path
            ),
            _ => hls_url,
        }
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        debug!(?status, body, "transcoder response");
        return Ok(serde_json::from_str::<T>(&body)?);
    }
    warn!(?status, body, "transcoder rejected request");
    Err(anyhow!(error_message(status, &body)))
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("transcoder returned {}", status),
    }
}

#[async_trait]
impl Transcoder for CloudTranscoder {
    async fn start(&self, req: StartRequest) -> Result<StartResponse> {
        let output_path = req.output_path.clone();
        let response = self
            .request(Method::POST, req.channel_id, "start")
            .json(&req)
            .send()
            .await?;
        let mut started: StartResponse = parse(response).await?;
        started.hls_url = self.hls_fallback(started.hls_url, &output_path);
        Ok(started)
    }

    async fn stop(&self, channel_id: Uuid) -> Result<()> {
        let response = self
            .request(Method::POST, channel_id, "stop")
            .json(&StopRequest { channel_id })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        warn!(?status, body, "transcoder rejected stop");
        Err(anyhow!(error_message(status, &body)))
    }

    async fn status(&self, channel_id: Uuid) -> Result<ProviderStatus> {
        let response = self
            .request(Method::GET, channel_id, "status")
            .send()
            .await?;
        parse(response).await
    }

    async fn transmit(&self, req: TransmitRequest) -> Result<TransmitResponse> {
        let response = self
            .request(Method::POST, req.channel_id, "transmit")
            .json(&req)
            .send()
            .await?;
        parse(response).await
    }
}
