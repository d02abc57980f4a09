//! End-to-end tests: real HTTP server, real TCP controller link

use std::net::SocketAddr;
use std::time::Duration;

use pretty_assertions::assert_eq;
use remote_core::config::TcpLinkConfig;
use remote_core::{LinkConfig, StoreConfig};
use remoted::{build_app, DaemonConfig};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

// =============================================================================
// Harness
// =============================================================================

/// Fake controller: records every event and answers `playing-status`
struct FakeController {
    address: SocketAddr,
    received: mpsc::UnboundedReceiver<Value>,
}

async fn spawn_controller(status: Value) -> FakeController {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (tx, received) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let event: Value = serde_json::from_str(&line).unwrap();
            if event["event"] == "playing-status" {
                let reply = json!({ "event": "playing-status", "payload": status });
                let mut frame = reply.to_string();
                frame.push('\n');
                write_half.write_all(frame.as_bytes()).await.unwrap();
            }
            if tx.send(event).is_err() {
                break;
            }
        }
    });

    FakeController { address, received }
}

async fn serve(config: DaemonConfig) -> String {
    let app = build_app(&config).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn tcp_config(controller: &FakeController, store: StoreConfig) -> DaemonConfig {
    let mut config = DaemonConfig::default();
    config.controller = LinkConfig::Tcp(TcpLinkConfig {
        address: controller.address.to_string(),
        connect_timeout_ms: 1000,
    });
    config.store = store;
    config.gateway.reply_timeout_ms = 1000;
    config
}

async fn next_event(controller: &mut FakeController) -> Value {
    tokio::time::timeout(Duration::from_secs(2), controller.received.recv())
        .await
        .unwrap()
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_volume_reaches_controller() {
    let mut controller = spawn_controller(json!({})).await;
    let base = serve(tcp_config(&controller, StoreConfig::Memory)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/player/volume", base))
        .json(&json!({ "value": 42 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        next_event(&mut controller).await,
        json!({ "event": "volume", "payload": 42 })
    );
}

#[tokio::test]
async fn test_now_playing_round_trip() {
    let status = json!({ "name": "Track", "playbackStatus": "PLAYING", "volume": 64 });
    let mut controller = spawn_controller(status.clone()).await;
    let base = serve(tcp_config(&controller, StoreConfig::Memory)).await;

    let response = reqwest::get(format!("{}/player/now-playing", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), status);
    assert_eq!(
        next_event(&mut controller).await,
        json!({ "event": "playing-status" })
    );
}

#[tokio::test]
async fn test_preset_selection_reads_settings_file() {
    let mut controller = spawn_controller(json!({})).await;
    let mut settings = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut settings,
        json!({
            "equalizer": {
                "selected": "Flat",
                "presets": { "Flat": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0], "Bass": [6, 5, 4, 0, 0, 0, 0, 0, 0, 0] }
            }
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap();
    let store = StoreConfig::File {
        path: settings.path().to_path_buf(),
    };
    let base = serve(tcp_config(&controller, store)).await;
    let client = reqwest::Client::new();

    let rejected = client
        .post(format!("{}/equalizer/Treble/set", base))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), 400);
    assert_eq!(rejected.text().await.unwrap(), "name should be one of Bass,Flat");

    let accepted = client
        .post(format!("{}/equalizer/Bass/set", base))
        .send()
        .await
        .unwrap();
    assert_eq!(accepted.status(), 200);
    assert_eq!(
        next_event(&mut controller).await,
        json!({ "event": "set-equalizer", "payload": "Bass" })
    );

    let snapshot: Value = client
        .get(format!("{}/equalizer", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["selected"], "Flat");
}

#[tokio::test]
async fn test_unreachable_controller_fails_startup() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let mut config = DaemonConfig::default();
    config.controller = LinkConfig::Tcp(TcpLinkConfig {
        address: address.to_string(),
        connect_timeout_ms: 500,
    });

    assert!(build_app(&config).await.is_err());
}

#[tokio::test]
async fn test_demo_mode_serves_mock_status() {
    let base = serve(DaemonConfig::default()).await;

    let status: Value = reqwest::get(format!("{}/player/now-playing", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["playbackStatus"], "PLAYING");

    let equalizer: Value = reqwest::get(format!("{}/equalizer", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(equalizer["selected"], "Default");
}
