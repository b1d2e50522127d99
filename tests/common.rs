#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use airman::config::Config;
use airman::orchestrator::Orchestrator;
use airman::provider::Transcoder;
use airman::service::database::DatabaseService;
use api::provider::{
    ProviderStatus, StartRequest, StartResponse, TransmitRequest, TransmitResponse,
};
use api::request::{AddProgram, CreateChannel, RegisterAsset};
use api::schedule::{ProgramType, RepeatPattern};
use auth::claims::Claims;

pub const OWNER: &str = "alice";

/// Counts every call and can be told to fail or stall.
#[derive(Debug, Default)]
pub struct MockTranscoder {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub statuses: AtomicUsize,
    pub transmits: AtomicUsize,
    pub fail: AtomicBool,
    /// Milliseconds every call sleeps before answering
    pub delay: AtomicU64,
    pub last_start: Mutex<Option<StartRequest>>,
}

impl MockTranscoder {
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
            + self.stops.load(Ordering::SeqCst)
            + self.statuses.load(Ordering::SeqCst)
            + self.transmits.load(Ordering::SeqCst)
    }

    async fn answer(&self) -> anyhow::Result<()> {
        let delay = self.delay.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("encoder pool exhausted"));
        }
        Ok(())
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn start(&self, req: StartRequest) -> anyhow::Result<StartResponse> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;
        let hls_url = format!("https://cdn.test/{}/index.m3u8", req.output_path);
        if let Ok(mut last) = self.last_start.lock() {
            *last = Some(req);
        }
        Ok(StartResponse {
            external_job_id: format!("job-{}", self.starts.load(Ordering::SeqCst)),
            hls_url,
            iframe_url: None,
        })
    }

    async fn stop(&self, _channel_id: Uuid) -> anyhow::Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.answer().await
    }

    async fn status(&self, _channel_id: Uuid) -> anyhow::Result<ProviderStatus> {
        self.statuses.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;
        Ok(ProviderStatus {
            current_source: Some("playlist".to_string()),
            is_active: true,
            ..Default::default()
        })
    }

    async fn transmit(&self, req: TransmitRequest) -> anyhow::Result<TransmitResponse> {
        self.transmits.fetch_add(1, Ordering::SeqCst);
        self.answer().await?;
        Ok(TransmitResponse {
            hls_url: format!("https://cdn.test/{}/{}.m3u8", req.channel_id, req.protocol),
            iframe_url: None,
        })
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub transcoder: Arc<MockTranscoder>,
    pub db: DatabaseConnection,
}

pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.database.url = "sqlite::memory:".to_string();
    cfg.provider.timeout = 500;
    cfg
}

pub async fn harness() -> Harness {
    harness_with(test_config()).await
}

pub async fn harness_with(cfg: Config) -> Harness {
    let database = DatabaseService::new(&cfg.database)
        .await
        .expect("in-memory database");
    let db = database.get_connection().clone();
    let transcoder = Arc::new(MockTranscoder::default());
    let orchestrator = Orchestrator::new(db.clone(), transcoder.clone(), &cfg);
    Harness {
        orchestrator,
        transcoder,
        db,
    }
}

pub fn owner() -> Claims {
    Claims::user(OWNER)
}

pub async fn channel(h: &Harness) -> Uuid {
    h.orchestrator
        .create_channel(
            &owner(),
            CreateChannel {
                name: "main".to_string(),
            },
        )
        .await
        .expect("create channel")
        .id
}

pub async fn asset(h: &Harness, title: &str) -> Uuid {
    h.orchestrator
        .register_asset(
            &owner(),
            RegisterAsset {
                title: title.to_string(),
                file_url: format!("https://media.test/{}.mp4", title),
                hls_url: None,
                duration_minutes: Some(60),
            },
        )
        .await
        .expect("register asset")
        .id
}

/// VOD program backed by a fresh asset
pub async fn vod(h: &Harness, channel_id: Uuid, title: &str, start_time: DateTime<Utc>) -> i32 {
    let asset_id = asset(h, title).await;
    h.orchestrator
        .add_program(
            channel_id,
            AddProgram {
                title: title.to_string(),
                program_type: ProgramType::Vod,
                start_time,
                duration_minutes: 60,
                asset_id: Some(asset_id),
                live_url: None,
                repeat_pattern: Some(RepeatPattern::None),
            },
        )
        .await
        .expect("add program")
        .id
}
