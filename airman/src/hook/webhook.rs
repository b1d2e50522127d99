use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use api::event::Event;

use super::{next_event, EventHook};

/// POSTs every event as JSON to an operator supplied URL
#[derive(Clone, Debug)]
pub struct WebHook {
    url: String,
    client: Client,
}

impl WebHook {
    pub fn new(url: String) -> Result<Self> {
        Ok(WebHook {
            url,
            client: Client::builder()
                .connect_timeout(Duration::from_millis(300))
                .timeout(Duration::from_millis(1000))
                .build()?,
        })
    }

    async fn event_handler(&self, event: Event) -> Result<()> {
        let req_body = serde_json::to_string(&event)?;
        match self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(req_body.clone())
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                let success = status.is_success();
                let res_body = response.text().await?;
                if success {
                    debug!(
                        url = self.url,
                        ?status,
                        req_body,
                        res_body,
                        "event webhook success"
                    );
                    Ok(())
                } else {
                    warn!(
                        url = self.url,
                        ?status,
                        req_body,
                        res_body,
                        "event webhook error"
                    );
                    Err(anyhow!(res_body))
                }
            }
            Err(err) => {
                warn!(url = self.url, req_body, ?err, "event webhook error");
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl EventHook for WebHook {
    async fn hook(&self, mut event_receiver: broadcast::Receiver<Event>) {
        while let Some(event) = next_event(&mut event_receiver).await {
            if let Err(err) = self.event_handler(event).await {
                trace!(?err, "event webhook delivery skipped");
            }
        }
    }
}
