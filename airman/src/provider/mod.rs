use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use api::provider::{
    ProviderStatus, StartRequest, StartResponse, TransmitRequest, TransmitResponse,
};

pub mod cloud;

/// The external service that encodes and delivers the channel output.
/// Errors carry the provider's own message.
#[async_trait]
pub trait Transcoder: Debug + Send + Sync {
    async fn start(&self, req: StartRequest) -> anyhow::Result<StartResponse>;

    async fn stop(&self, channel_id: Uuid) -> anyhow::Result<()>;

    async fn status(&self, channel_id: Uuid) -> anyhow::Result<ProviderStatus>;

    async fn transmit(&self, req: TransmitRequest) -> anyhow::Result<TransmitResponse>;
}
