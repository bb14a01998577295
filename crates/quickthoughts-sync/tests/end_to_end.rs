//! Runs the sync client against a live gateway on a loopback port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use quickthoughts_core::config::QuickThoughtsConfig;
use quickthoughts_gateway::{build_router, AppState};
use quickthoughts_store::MemoryKv;
use quickthoughts_sync::{run, RelayClient, SyncError, SyncOptions, SyncOutcome};
use quickthoughts_telegram::{Messenger, TelegramError};

const SECRET: &str = "obsidian-sync-e2e";

struct Silent;

#[async_trait]
impl Messenger for Silent {
    async fn send_message(&self, _chat_id: i64, _text: &str) -> Result<(), TelegramError> {
        Ok(())
    }

    async fn set_webhook(&self, _url: &str) -> Result<Value, TelegramError> {
        Ok(json!({"ok": true}))
    }
}

async fn spawn_relay() -> (String, Arc<AppState>) {
    let mut config = QuickThoughtsConfig::default();
    config.telegram.bot_token = "123:abc".into();
    config.telegram.allowed_user_id = 1;
    config.sync.secret = Some(SECRET.into());

    let state = Arc::new(AppState::new(
        config,
        Arc::new(MemoryKv::new()),
        Arc::new(Silent),
    ));
    let router = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn options(dir: &tempfile::TempDir) -> SyncOptions {
    SyncOptions {
        note_path: dir.path().join("vault").join("Quick Thoughts.md"),
        dry_run: false,
        keep: false,
    }
}

async fn seed(state: &AppState) {
    let t = |h| Utc.with_ymd_and_hms(2026, 1, 22, h, 15, 0).unwrap();
    state.thoughts.capture("afternoon idea", t(14)).await.unwrap();
    state.thoughts.capture("morning idea", t(9)).await.unwrap();
}

#[tokio::test]
async fn sync_writes_note_and_clears_relay() {
    let (url, state) = spawn_relay().await;
    seed(&state).await;
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);

    let client = RelayClient::new(&url, SECRET).unwrap();
    let outcome = run(&client, &opts).await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Written {
            fetched: 2,
            path: opts.note_path.clone(),
            cleared: Some(2),
        }
    );
    let note = std::fs::read_to_string(&opts.note_path).unwrap();
    assert_eq!(
        note,
        "## 2026-01-22\n- 09:15 – morning idea\n- 14:15 – afternoon idea\n"
    );
    assert_eq!(state.thoughts.pending_count().await.unwrap(), 0);

    // a second run finds nothing
    assert_eq!(
        run(&client, &opts).await.unwrap(),
        SyncOutcome::NothingPending
    );
}

#[tokio::test]
async fn dry_run_touches_nothing() {
    let (url, state) = spawn_relay().await;
    seed(&state).await;
    let dir = tempfile::tempdir().unwrap();
    let opts = SyncOptions {
        dry_run: true,
        ..options(&dir)
    };

    let client = RelayClient::new(&url, SECRET).unwrap();
    let SyncOutcome::DryRun { fetched, rendered } = run(&client, &opts).await.unwrap() else {
        panic!("expected dry run");
    };
    assert_eq!(fetched, 2);
    assert!(rendered.contains("- 09:15 – morning idea"));
    assert!(!opts.note_path.exists());
    assert_eq!(state.thoughts.pending_count().await.unwrap(), 2);
}

#[tokio::test]
async fn keep_writes_but_does_not_clear() {
    let (url, state) = spawn_relay().await;
    seed(&state).await;
    let dir = tempfile::tempdir().unwrap();
    let opts = SyncOptions {
        keep: true,
        ..options(&dir)
    };

    let client = RelayClient::new(&url, SECRET).unwrap();
    let outcome = run(&client, &opts).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Written { cleared: None, .. }));
    assert!(opts.note_path.exists());
    assert_eq!(state.thoughts.pending_count().await.unwrap(), 2);

    // kept thoughts are still pending, so the next run writes them again
    let again = run(&client, &opts).await.unwrap();
    assert!(matches!(again, SyncOutcome::Written { fetched: 2, .. }));
    let note = std::fs::read_to_string(&opts.note_path).unwrap();
    assert_eq!(note.matches("morning idea").count(), 2);
}

#[tokio::test]
async fn repeated_text_in_one_minute_is_written_twice_before_clearing() {
    let (url, state) = spawn_relay().await;
    let first = Utc.with_ymd_and_hms(2026, 1, 22, 9, 15, 1).unwrap();
    let second = Utc.with_ymd_and_hms(2026, 1, 22, 9, 15, 40).unwrap();
    state.thoughts.capture("call mom", first).await.unwrap();
    state.thoughts.capture("call mom", second).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let opts = options(&dir);

    let client = RelayClient::new(&url, SECRET).unwrap();
    let outcome = run(&client, &opts).await.unwrap();
    assert!(matches!(
        outcome,
        SyncOutcome::Written {
            fetched: 2,
            cleared: Some(2),
            ..
        }
    ));
    let note = std::fs::read_to_string(&opts.note_path).unwrap();
    assert_eq!(
        note,
        "## 2026-01-22\n- 09:15 – call mom\n- 09:15 – call mom\n"
    );
}

#[tokio::test]
async fn large_backlog_is_cleared_completely() {
    let (url, state) = spawn_relay().await;
    let start = Utc.with_ymd_and_hms(2026, 1, 22, 0, 0, 0).unwrap();
    for i in 0..450 {
        let at = start + chrono::Duration::milliseconds(i);
        state.thoughts.capture(&format!("t{i}"), at).await.unwrap();
    }
    let client = RelayClient::new(&url, SECRET).unwrap();

    let ids: Vec<_> = client
        .fetch_thoughts()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids.len(), 450);
    assert_eq!(client.clear_thoughts(&ids).await.unwrap(), 450);
    assert_eq!(state.thoughts.pending_count().await.unwrap(), 0);
}

#[tokio::test]
async fn thoughts_captured_after_fetch_survive_the_clear() {
    let (url, state) = spawn_relay().await;
    seed(&state).await;
    let client = RelayClient::new(&url, SECRET).unwrap();

    let fetched = client.fetch_thoughts().await.unwrap();
    let late = Utc.with_ymd_and_hms(2026, 1, 22, 20, 0, 0).unwrap();
    state.thoughts.capture("arrived late", late).await.unwrap();

    let ids: Vec<_> = fetched.into_iter().map(|t| t.id).collect();
    assert_eq!(client.clear_thoughts(&ids).await.unwrap(), 2);

    let left = state.thoughts.list_sorted().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].text, "arrived late");
}

#[tokio::test]
async fn wrong_secret_is_reported() {
    let (url, _state) = spawn_relay().await;
    let dir = tempfile::tempdir().unwrap();
    let client = RelayClient::new(&url, "not-the-secret").unwrap();

    let err = run(&client, &options(&dir)).await.unwrap_err();
    assert!(matches!(err, SyncError::Api { status: 401, .. }));
    assert!(!options(&dir).note_path.exists());
}
