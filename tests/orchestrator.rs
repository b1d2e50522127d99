use std::sync::atomic::Ordering;

use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};

use airman::entity::streaming_sessions;
use airman::error::AppError;
use airman::resolver::TieBreak;
use airman::service::{
    channels::ChannelsService, execution_logs::ExecutionLogsService, outputs::OutputsService,
    sessions::SessionsService,
};
use api::event::{ProviderEventKind, ProviderNotification};
use api::request::{OutputConfig, Transmit};
use api::schedule::ProgramType;
use api::session::{Protocol, SessionStatus, SourceType};
use auth::claims::Claims;

mod common;

use common::{channel, harness, harness_with, test_config, vod};

#[tokio::test]
async fn test_start_empty_schedule() {
    let h = harness().await;
    let channel_id = channel(&h).await;

    let err = h.orchestrator.start(channel_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::NoScheduledContent));
    assert_eq!(h.transcoder.calls(), 0);
    assert!(SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_start_current_program() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let program = vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let current = h.orchestrator.get_current(channel_id).await.unwrap();
    assert_eq!(current.current.as_ref().unwrap().airing.program.id, program);
    assert!(current.next.is_none());

    let started = h.orchestrator.start(channel_id, None).await.unwrap();
    assert!(!started.already_active);
    assert_eq!(started.current_program.unwrap().program.title, "A");
    assert_eq!(started.stream.external_job_id.as_deref(), Some("job-1"));
    assert_eq!(h.transcoder.starts.load(Ordering::SeqCst), 1);

    let request = h.transcoder.last_start.lock().unwrap().clone().unwrap();
    assert_eq!(request.playlist.len(), 1);
    assert_eq!(request.playlist[0].media_url, "https://media.test/A.mp4");
    assert_eq!(request.playlist[0].duration_seconds, 3600);
    assert_eq!(request.output_path, format!("streams/{}", channel_id));

    assert_eq!(
        ExecutionLogsService::count_open(&h.db, started.session_id)
            .await
            .unwrap(),
        1
    );
    let record = ChannelsService::get(&h.db, channel_id).await.unwrap().unwrap();
    assert!(record.is_live);
    assert!(record.schedule_active);
    assert_eq!(
        record.hls_url,
        Some(format!("https://cdn.test/streams/{}/index.m3u8", channel_id))
    );
}

#[tokio::test]
async fn test_start_twice_returns_existing_session() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let first = h.orchestrator.start(channel_id, None).await.unwrap();
    let second = h.orchestrator.start(channel_id, None).await.unwrap();
    assert!(second.already_active);
    assert_eq!(first.session_id, second.session_id);
    assert_eq!(h.transcoder.starts.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_start_single_session() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;
    h.transcoder.delay.store(50, Ordering::SeqCst);

    let (a, b, c) = tokio::join!(
        h.orchestrator.start(channel_id, None),
        h.orchestrator.start(channel_id, None),
        h.orchestrator.start(channel_id, None),
    );
    let results = [a.unwrap(), b.unwrap(), c.unwrap()];
    assert_eq!(results.iter().filter(|r| !r.already_active).count(), 1);
    assert!(results.iter().all(|r| r.session_id == results[0].session_id));
    assert_eq!(h.transcoder.starts.load(Ordering::SeqCst), 1);
    assert_eq!(
        streaming_sessions::Entity::find().count(&h.db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_advance_wraps_around() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let now = Utc::now();
    let a = vod(&h, channel_id, "A", now - Duration::minutes(10)).await;
    let b = vod(&h, channel_id, "B", now + Duration::minutes(50)).await;
    let c = vod(&h, channel_id, "C", now + Duration::minutes(110)).await;

    h.orchestrator.start(channel_id, None).await.unwrap();

    let mut visited = vec![];
    for _ in 0..3 {
        let advanced = h.orchestrator.advance_to_next(channel_id).await.unwrap();
        visited.push((advanced.position, advanced.program.program.id));
    }
    assert_eq!(visited, vec![(1, b), (2, c), (0, a)]);

    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.current_program_id, Some(a));
    assert_eq!(session.playlist_position, 0);
    assert_eq!(
        ExecutionLogsService::count_completed(&h.db, session.id)
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn test_advance_without_session() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let err = h.orchestrator.advance_to_next(channel_id).await.unwrap_err();
    assert!(matches!(err, AppError::NoActiveSession));
}

#[tokio::test]
async fn test_stop_closes_every_log() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let now = Utc::now();
    vod(&h, channel_id, "A", now - Duration::minutes(10)).await;
    vod(&h, channel_id, "B", now + Duration::minutes(50)).await;

    let started = h
        .orchestrator
        .start(
            channel_id,
            Some(OutputConfig {
                protocol: Protocol::Rtmp,
                target_url: "rtmp://ingest.test/live".to_string(),
                bitrate: Some(4500),
                resolution: Some("1920x1080".to_string()),
            }),
        )
        .await
        .unwrap();
    h.orchestrator.advance_to_next(channel_id).await.unwrap();
    h.orchestrator.advance_to_next(channel_id).await.unwrap();

    let stopped = h.orchestrator.stop(channel_id).await.unwrap();
    assert!(stopped.stopped);
    assert_eq!(
        ExecutionLogsService::count_open(&h.db, started.session_id)
            .await
            .unwrap(),
        0
    );

    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status, SessionStatus::Idle.to_string());
    assert!(SessionsService::metadata(&session).stopped_at.is_some());

    let record = ChannelsService::get(&h.db, channel_id).await.unwrap().unwrap();
    assert!(!record.is_live);
    assert!(!record.schedule_active);

    let outputs = OutputsService::list(&h.db, channel_id).await.unwrap();
    assert_eq!(outputs.len(), 1);
    assert!(outputs.iter().all(|o| !o.is_active));
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let idle = h.orchestrator.stop(channel_id).await.unwrap();
    assert!(!idle.stopped);
    assert_eq!(h.transcoder.calls(), 0);

    h.orchestrator.start(channel_id, None).await.unwrap();
    assert!(h.orchestrator.stop(channel_id).await.unwrap().stopped);
    let before = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();

    assert!(!h.orchestrator.stop(channel_id).await.unwrap().stopped);
    let after = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before, after);
    assert_eq!(h.transcoder.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_restart_after_stop_reuses_row() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let first = h.orchestrator.start(channel_id, None).await.unwrap();
    h.orchestrator.stop(channel_id).await.unwrap();
    let second = h.orchestrator.start(channel_id, None).await.unwrap();

    assert!(!second.already_active);
    assert_eq!(first.session_id, second.session_id);
    assert_eq!(h.transcoder.starts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_failure_leaves_state() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;
    h.transcoder.fail(true);

    let err = h.orchestrator.start(channel_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalProviderError(ref m) if m.contains("encoder pool exhausted")));
    assert!(SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .is_none());
    let record = ChannelsService::get(&h.db, channel_id).await.unwrap().unwrap();
    assert!(!record.is_live);
}

#[tokio::test]
async fn test_provider_timeout() {
    let mut cfg = test_config();
    cfg.provider.timeout = 20;
    let h = harness_with(cfg).await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;
    h.transcoder.delay.store(200, Ordering::SeqCst);

    let err = h.orchestrator.start(channel_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalProviderError(_)));
    assert!(SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_stop_cleans_up_when_provider_fails() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;
    let started = h.orchestrator.start(channel_id, None).await.unwrap();

    h.transcoder.fail(true);
    let err = h.orchestrator.stop(channel_id).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalProviderError(_)));

    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status, SessionStatus::Idle.to_string());
    assert_eq!(
        ExecutionLogsService::count_open(&h.db, started.session_id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_live_then_fallback() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let now = Utc::now();
    let a = vod(&h, channel_id, "A", now - Duration::minutes(10)).await;
    vod(&h, channel_id, "B", now + Duration::minutes(50)).await;

    h.orchestrator.start(channel_id, None).await.unwrap();
    h.orchestrator.advance_to_next(channel_id).await.unwrap();

    let live = h.orchestrator.switch_to_live(channel_id).await.unwrap();
    assert_eq!(live.session.source_type, SourceType::Live);
    assert_eq!(live.session.playlist_position, 1);

    let fallback = h.orchestrator.fallback_to_playlist(channel_id).await.unwrap();
    assert_eq!(fallback.session.source_type, SourceType::Playlist);
    assert_eq!(fallback.session.status, SessionStatus::Active);
    assert_eq!(fallback.session.current_program_id, Some(a));
    assert_eq!(fallback.program.unwrap().program.id, a);
    assert_eq!(
        ExecutionLogsService::count_open(&h.db, fallback.session.id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(h.transcoder.calls(), 1);
}

#[tokio::test]
async fn test_live_disconnect_notification_falls_back() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let a = vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;
    h.orchestrator.start(channel_id, None).await.unwrap();
    h.orchestrator.switch_to_live(channel_id).await.unwrap();

    h.orchestrator
        .handle_provider_notification(ProviderNotification {
            channel_id,
            event: ProviderEventKind::LiveDisconnected,
            timestamp: Some(Utc::now()),
            data: None,
            error: None,
        })
        .await
        .unwrap();

    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.source_type, SourceType::Playlist.to_string());
    assert_eq!(session.current_program_id, Some(a));
}

#[tokio::test]
async fn test_stream_stopped_notification() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;
    let started = h.orchestrator.start(channel_id, None).await.unwrap();

    h.orchestrator
        .handle_provider_notification(ProviderNotification {
            channel_id,
            event: ProviderEventKind::StreamStopped,
            timestamp: None,
            data: None,
            error: None,
        })
        .await
        .unwrap();

    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status, SessionStatus::Idle.to_string());
    assert_eq!(
        ExecutionLogsService::count_open(&h.db, started.session_id)
            .await
            .unwrap(),
        0
    );
    assert_eq!(h.transcoder.stops.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_report_error_keeps_playing() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let err = h
        .orchestrator
        .report_error(channel_id, "decoder stalled".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoActiveSession));

    let started = h.orchestrator.start(channel_id, None).await.unwrap();
    let session = h
        .orchestrator
        .report_error(channel_id, "decoder stalled".to_string())
        .await
        .unwrap();
    assert_eq!(session.status, SessionStatus::Error);
    assert_eq!(session.error_message.as_deref(), Some("decoder stalled"));
    assert_eq!(
        ExecutionLogsService::count_open(&h.db, started.session_id)
            .await
            .unwrap(),
        1
    );

    let restarted = h.orchestrator.start(channel_id, None).await.unwrap();
    assert!(!restarted.already_active);
    assert_eq!(
        ExecutionLogsService::count_open(&h.db, started.session_id)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_transmit() {
    let h = harness().await;
    let channel_id = channel(&h).await;

    let err = h
        .orchestrator
        .transmit(
            channel_id,
            Transmit {
                protocol: Protocol::Udp,
                target: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(h.transcoder.calls(), 0);

    let rtmp = Transmit {
        protocol: Protocol::Rtmp,
        target: Some("rtmp://ingest.test/live".to_string()),
    };
    h.orchestrator.transmit(channel_id, rtmp.clone()).await.unwrap();
    h.orchestrator.transmit(channel_id, rtmp).await.unwrap();
    let hls = h
        .orchestrator
        .transmit(
            channel_id,
            Transmit {
                protocol: Protocol::Hls,
                target: None,
            },
        )
        .await
        .unwrap();
    assert!(hls.hls_url.ends_with("hls.m3u8"));

    let outputs = OutputsService::list(&h.db, channel_id).await.unwrap();
    assert_eq!(outputs.len(), 2);
    assert!(outputs.iter().all(|o| o.is_active));
    let record = ChannelsService::get(&h.db, channel_id).await.unwrap().unwrap();
    assert!(record.is_live);
}

#[tokio::test]
async fn test_status_only_queries_running_provider() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let idle = h.orchestrator.status(channel_id).await.unwrap();
    assert!(idle.session.is_none());
    assert!(idle.provider.is_none());
    assert_eq!(h.transcoder.statuses.load(Ordering::SeqCst), 0);

    h.orchestrator.start(channel_id, None).await.unwrap();
    let running = h.orchestrator.status(channel_id).await.unwrap();
    assert!(running.provider.unwrap().is_active);
    let current = running.current_program.unwrap();
    assert!(current.progress.percentage > 0.0 && current.progress.percentage < 100.0);

    h.transcoder.fail(true);
    let degraded = h.orchestrator.status(channel_id).await.unwrap();
    assert!(degraded.session.is_some());
    assert!(degraded.provider.is_none());
}

#[tokio::test]
async fn test_tie_break() {
    let start = Utc::now() - Duration::minutes(5);

    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "first", start).await;
    let second = vod(&h, channel_id, "second", start).await;
    let current = h.orchestrator.get_current(channel_id).await.unwrap();
    assert_eq!(current.current.unwrap().airing.program.id, second);

    let mut cfg = test_config();
    cfg.schedule.tie_break = TieBreak::Earliest;
    let h = harness_with(cfg).await;
    let channel_id = channel(&h).await;
    let first = vod(&h, channel_id, "first", start).await;
    vod(&h, channel_id, "second", start).await;
    let current = h.orchestrator.get_current(channel_id).await.unwrap();
    assert_eq!(current.current.unwrap().airing.program.id, first);
}

#[tokio::test]
async fn test_monitoring_views() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let now = Utc::now();
    vod(&h, channel_id, "old", now - Duration::hours(3)).await;
    let a = vod(&h, channel_id, "A", now - Duration::minutes(10)).await;
    vod(&h, channel_id, "B", now + Duration::minutes(50)).await;

    let playlist = h.orchestrator.get_playlist(channel_id).await.unwrap();
    assert_eq!(playlist.current.unwrap().program.id, a);
    assert_eq!(playlist.past.len(), 1);
    assert_eq!(playlist.upcoming.len(), 1);
    assert_eq!(playlist.total_count, 3);

    h.orchestrator.start(channel_id, None).await.unwrap();
    h.orchestrator.advance_to_next(channel_id).await.unwrap();

    let schedule = h.orchestrator.get_schedule(channel_id).await.unwrap();
    let played = schedule.iter().find(|i| i.program.id == a).unwrap();
    assert_eq!(played.execution_count, 1);
    assert!(played.last_played.is_some());

    let logs = h.orchestrator.get_logs(channel_id, Some(1)).await.unwrap();
    assert_eq!(logs.sessions.len(), 1);
    assert_eq!(logs.executions.len(), 1);

    let stats = h.orchestrator.get_stats(channel_id).await.unwrap();
    assert!(stats.is_active);
    assert_eq!(stats.programs_played, 1);
}

#[tokio::test]
async fn test_program_management() {
    let h = harness().await;
    let channel_id = channel(&h).await;

    let err = h
        .orchestrator
        .add_program(
            channel_id,
            api::request::AddProgram {
                title: "feed".to_string(),
                program_type: ProgramType::Live,
                start_time: Utc::now(),
                duration_minutes: 30,
                asset_id: None,
                live_url: None,
                repeat_pattern: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let id = vod(&h, channel_id, "A", Utc::now()).await;
    h.orchestrator.delete_program(channel_id, id).await.unwrap();
    let err = h.orchestrator.delete_program(channel_id, id).await.unwrap_err();
    assert!(matches!(err, AppError::ProgramNotFound));

    let err = h
        .orchestrator
        .authorize(channel_id, &Claims::user("mallory"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied));
    assert!(h
        .orchestrator
        .authorize(channel_id, &Claims::admin())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_heartbeat_records_provider_payload() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    vod(&h, channel_id, "A", Utc::now() - Duration::minutes(10)).await;

    let err = h.orchestrator.heartbeat(channel_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::NoActiveSession));

    let started = h.orchestrator.start(channel_id, None).await.unwrap();
    let beat = h
        .orchestrator
        .heartbeat(channel_id, Some(serde_json::json!({ "fps": 25 })))
        .await
        .unwrap();
    assert_eq!(beat.session_id, started.session_id);

    h.orchestrator.heartbeat(channel_id, None).await.unwrap();
    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    let metadata = SessionsService::metadata(&session);
    assert_eq!(metadata.provider, Some(serde_json::json!({ "fps": 25 })));
    assert_eq!(metadata.external_job_id.as_deref(), Some("job-1"));
    assert!(session.last_heartbeat.is_some());
}

#[tokio::test]
async fn test_stopped_channel_stays_idle() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let now = Utc::now();
    vod(&h, channel_id, "A", now - Duration::minutes(10)).await;
    vod(&h, channel_id, "B", now + Duration::minutes(50)).await;

    h.orchestrator.start(channel_id, None).await.unwrap();
    h.orchestrator.stop(channel_id).await.unwrap();

    let err = h
        .orchestrator
        .report_error(channel_id, "late failure".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoActiveSession));
    assert!(matches!(
        h.orchestrator.advance_to_next(channel_id).await.unwrap_err(),
        AppError::NoActiveSession
    ));
    assert!(matches!(
        h.orchestrator.fallback_to_playlist(channel_id).await.unwrap_err(),
        AppError::NoActiveSession
    ));
    assert!(matches!(
        h.orchestrator.switch_to_live(channel_id).await.unwrap_err(),
        AppError::NoActiveSession
    ));
    assert!(matches!(
        h.orchestrator.heartbeat(channel_id, None).await.unwrap_err(),
        AppError::NoActiveSession
    ));

    h.orchestrator
        .handle_provider_notification(ProviderNotification {
            channel_id,
            event: ProviderEventKind::Error,
            timestamp: None,
            data: None,
            error: Some("encoder crashed".to_string()),
        })
        .await
        .unwrap();

    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status, SessionStatus::Idle.to_string());
    assert_eq!(session.error_message, None);
    let record = ChannelsService::get(&h.db, channel_id).await.unwrap().unwrap();
    assert!(!record.is_live);
    assert!(!record.schedule_active);

    assert!(!h.orchestrator.stop(channel_id).await.unwrap().stopped);
    assert_eq!(h.transcoder.starts.load(Ordering::SeqCst), 1);
    assert_eq!(h.transcoder.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_start_skips_unplayable_airing() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    let now = Utc::now();
    h.orchestrator
        .add_program(
            channel_id,
            api::request::AddProgram {
                title: "no asset".to_string(),
                program_type: ProgramType::Vod,
                start_time: now - Duration::minutes(10),
                duration_minutes: 60,
                asset_id: None,
                live_url: None,
                repeat_pattern: None,
            },
        )
        .await
        .unwrap();
    let b = vod(&h, channel_id, "B", now + Duration::minutes(50)).await;
    let c = vod(&h, channel_id, "C", now + Duration::minutes(110)).await;

    let started = h.orchestrator.start(channel_id, None).await.unwrap();
    assert_eq!(started.current_program.unwrap().program.id, b);

    let request = h.transcoder.last_start.lock().unwrap().clone().unwrap();
    let titles: Vec<&str> = request.playlist.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "C"]);

    let session = SessionsService::find_by_channel(&h.db, channel_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.current_program_id, Some(b));
    let logs = ExecutionLogsService::list_for_session(&h.db, session.id, None)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].program_id, Some(b));

    let advanced = h.orchestrator.advance_to_next(channel_id).await.unwrap();
    assert_eq!((advanced.position, advanced.program.program.id), (1, c));
    let record = ChannelsService::get(&h.db, channel_id).await.unwrap().unwrap();
    assert_eq!(record.hls_url.as_deref(), Some("https://media.test/C.mp4"));

    let advanced = h.orchestrator.advance_to_next(channel_id).await.unwrap();
    assert_eq!((advanced.position, advanced.program.program.id), (0, b));
}

#[tokio::test]
async fn test_start_nothing_playable() {
    let h = harness().await;
    let channel_id = channel(&h).await;
    h.orchestrator
        .add_program(
            channel_id,
            api::request::AddProgram {
                title: "no asset".to_string(),
                program_type: ProgramType::Vod,
                start_time: Utc::now() - Duration::minutes(10),
                duration_minutes: 60,
                asset_id: None,
                live_url: None,
                repeat_pattern: None,
            },
        )
        .await
        .unwrap();

    let err = h.orchestrator.start(channel_id, None).await.unwrap_err();
    assert!(matches!(err, AppError::NoScheduledContent));
    assert_eq!(h.transcoder.calls(), 0);
}
