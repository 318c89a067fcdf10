// Integration tests for the LiveReload server
// A real server is started on an ephemeral port and driven by WebSocket clients

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use livereload_server::{LiveReloadError, LiveReloadServer, ReloadConfig};

type Browser = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn test_config() -> ReloadConfig {
    ReloadConfig::new("127.0.0.1", 0)
}

fn start_server(config: ReloadConfig) -> LiveReloadServer {
    match LiveReloadServer::start(config) {
        Ok(server) => server,
        Err(e) => panic!("Failed to start test server: {}", e),
    }
}

fn runtime() -> Runtime {
    match Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => panic!("Failed to create Tokio runtime: {}", e),
    }
}

// Connect like the LiveReload extension does
async fn connect(server: &LiveReloadServer) -> Browser {
    let url = format!("ws://{}/livereload", server.local_addr());
    match tokio::time::timeout(Duration::from_secs(5), connect_async(url)).await {
        Ok(Ok((ws, _))) => ws,
        Ok(Err(e)) => panic!("Failed to establish WebSocket connection: {}", e),
        Err(_) => panic!("WebSocket connection timeout after 5 seconds"),
    }
}

async fn next_json(ws: &mut Browser) -> Value {
    let msg = match tokio::time::timeout(Duration::from_secs(5), ws.next()).await {
        Ok(Some(Ok(msg))) => msg,
        Ok(Some(Err(e))) => panic!("Error receiving frame: {}", e),
        Ok(None) => panic!("Connection closed unexpectedly"),
        Err(_) => panic!("Timeout waiting for server frame"),
    };
    let text = match msg.into_text() {
        Ok(text) => text,
        Err(e) => panic!("Failed to convert frame to text: {}", e),
    };
    match serde_json::from_str(&text) {
        Ok(json) => json,
        Err(e) => panic!("Failed to parse frame JSON: {}", e),
    }
}

// Connect and consume the handshake, then wait until the server lists us
async fn connect_live(server: &LiveReloadServer, expected_clients: usize) -> Browser {
    let mut ws = connect(server).await;
    let hello = next_json(&mut ws).await;
    assert_eq!(hello["command"], "hello");
    wait_for_clients(server, expected_clients).await;
    ws
}

async fn wait_for_clients(server: &LiveReloadServer, expected: usize) {
    for _ in 0..100 {
        if server.client_count() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!(
        "Expected {} live connections, found {}",
        expected,
        server.client_count()
    );
}

async fn assert_silent(ws: &mut Browser) {
    if let Ok(Some(frame)) = tokio::time::timeout(Duration::from_millis(300), ws.next()).await {
        panic!("Unexpected frame: {:?}", frame);
    }
}

#[test]
fn test_handshake_advertises_protocol_7() {
    let server = start_server(test_config().with_apply_sass_live(true).with_notify(true));

    runtime().block_on(async {
        let mut ws = connect(&server).await;
        let hello = next_json(&mut ws).await;

        assert_eq!(hello["command"], "hello");
        assert_eq!(
            hello["protocols"],
            json!(["http://livereload.com/protocols/official-7"])
        );
        assert!(hello["serverName"].is_string());
    });
}

#[test]
fn test_broadcast_reaches_every_browser() {
    let server = start_server(test_config().with_apply_sass_live(true));

    runtime().block_on(async {
        let mut first = connect_live(&server, 1).await;
        let mut second = connect_live(&server, 2).await;

        let sent = server.broadcast(&["styles/app.scss", "index.html"]);
        assert_eq!(sent, 4);

        for ws in [&mut first, &mut second] {
            let reload = next_json(ws).await;
            assert_eq!(reload["command"], "reload");
            assert_eq!(reload["liveCSS"], true);
            assert!(reload.get("overrideURL").is_none());
            let path = reload["path"].as_str().unwrap();
            assert!(path.ends_with("/styles/app.css"), "unexpected path {}", path);
            assert!(path.starts_with('/') || path.contains(':'));

            let reload = next_json(ws).await;
            assert!(reload["path"].as_str().unwrap().ends_with("/index.html"));
        }
    });
}

#[test]
fn test_override_url_for_existing_file() {
    let server = start_server(test_config().with_override_url(true));

    runtime().block_on(async {
        let mut ws = connect_live(&server, 1).await;

        // Integration tests run from the package root
        server.broadcast(&["Cargo.toml", "missing/file.css"]);

        let existing = next_json(&mut ws).await;
        assert_eq!(existing["overrideURL"], "/Cargo.toml");

        let missing = next_json(&mut ws).await;
        assert!(missing.get("overrideURL").is_none());
    });
}

#[test]
fn test_closed_browser_leaves_live_set() {
    let server = start_server(test_config());

    runtime().block_on(async {
        let mut staying = connect_live(&server, 1).await;
        let mut leaving = connect_live(&server, 2).await;

        if let Err(e) = leaving.close(None).await {
            println!("Warning: Failed to close WebSocket connection gracefully: {}", e);
        }
        wait_for_clients(&server, 1).await;

        assert_eq!(server.broadcast(&["app.js"]), 1);
        let reload = next_json(&mut staying).await;
        assert!(reload["path"].as_str().unwrap().ends_with("/app.js"));
    });
}

#[test]
fn test_inbound_frames_do_not_drop_connection() {
    let server = start_server(test_config());

    runtime().block_on(async {
        let mut ws = connect_live(&server, 1).await;

        let frames = [
            json!({
                "command": "hello",
                "protocols": ["http://livereload.com/protocols/official-7"]
            })
            .to_string(),
            json!({"command": "url", "url": "http://localhost:3000/"}).to_string(),
            json!({"command": "info", "plugins": {}, "url": "http://localhost:3000/"}).to_string(),
            json!({"command": "something-new"}).to_string(),
            "{not json".to_string(),
        ];
        for frame in frames {
            if let Err(e) = ws.send(Message::Text(frame)).await {
                panic!("Failed to send frame: {}", e);
            }
        }

        // None of these get a reply
        assert_silent(&mut ws).await;
        assert_eq!(server.client_count(), 1);

        assert_eq!(server.broadcast(&["app.css"]), 1);
        assert_eq!(next_json(&mut ws).await["command"], "reload");
    });
}

#[test]
fn test_broadcast_without_browsers() {
    let server = start_server(test_config().with_notify(true));
    assert_eq!(server.client_count(), 0);
    assert_eq!(server.broadcast(&["app.css"]), 0);
    assert_eq!(server.broadcast::<&str>(&[]), 0);
}

#[test]
fn test_empty_batch_sends_no_frames() {
    let server = start_server(test_config());

    runtime().block_on(async {
        let mut ws = connect_live(&server, 1).await;
        assert_eq!(server.broadcast::<&str>(&[]), 0);
        assert_silent(&mut ws).await;
    });
}

#[test]
fn test_port_in_use_fails_start() {
    let first = start_server(test_config());
    let taken = ReloadConfig::new("127.0.0.1", first.local_addr().port());

    match LiveReloadServer::start(taken) {
        Err(LiveReloadError::BindError { .. }) => {}
        Err(e) => panic!("Expected bind error, got {}", e),
        Ok(_) => panic!("Second server bound an occupied port"),
    }
}

#[test]
fn test_stop_is_repeatable() {
    let mut server = start_server(test_config());
    assert!(server.is_running());

    server.stop();
    server.stop();

    assert!(!server.is_running());
    assert_eq!(server.broadcast(&["app.css"]), 0);
}
