use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use vitrine_api::{create_router, AppState};
use vitrine_catalog::test_utils::test_helpers::{sample_product, seed_catalog, temp_catalog};
use vitrine_catalog::CatalogStore;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Serves the full router on an ephemeral port with one seeded product
async fn spawn_server() -> (TempDir, SocketAddr) {
    let (dir, path) = temp_catalog();
    seed_catalog(&path, &[sample_product(1, "P1")]).await;
    let store = Arc::new(CatalogStore::load(&path).await);
    let app = create_router(AppState::new(store, 8));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    (dir, addr)
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    client
}

/// Next JSON text frame, skipping control frames
async fn next_event(client: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
            .unwrap();
        if message.is_text() {
            return serde_json::from_str(message.to_text().unwrap()).unwrap();
        }
    }
}

async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .unwrap();
}

fn snapshot_codes(event: &Value) -> Vec<String> {
    assert_eq!(event["event"], "catalog_snapshot");
    event["data"]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_connect_receives_current_catalog() {
    let (_dir, addr) = spawn_server().await;
    let mut client = connect(addr).await;

    let first = next_event(&mut client).await;

    assert_eq!(snapshot_codes(&first), vec!["P1"]);
}

#[tokio::test]
async fn test_add_replies_to_requester_then_broadcasts() {
    let (_dir, addr) = spawn_server().await;
    let mut requester = connect(addr).await;
    let mut observer = connect(addr).await;
    // Each client is subscribed once its initial snapshot arrives
    next_event(&mut requester).await;
    next_event(&mut observer).await;

    send_json(
        &mut requester,
        json!({
            "event": "add_product",
            "data": {"request_id": "r1", "product": {"code": "P2", "title": "Mug", "price": 4.5}}
        }),
    )
    .await;

    let reply = next_event(&mut requester).await;
    assert_eq!(reply["event"], "add_product_response");
    assert_eq!(reply["data"]["request_id"], "r1");
    assert_eq!(reply["data"]["status"]["status"], "ok");
    assert_eq!(reply["data"]["status"]["message"]["id"], 2);
    assert_eq!(reply["data"]["status"]["message"]["status"], true);

    let requester_snapshot = next_event(&mut requester).await;
    assert_eq!(snapshot_codes(&requester_snapshot), vec!["P1", "P2"]);

    let observer_snapshot = next_event(&mut observer).await;
    assert_eq!(snapshot_codes(&observer_snapshot), vec!["P1", "P2"]);
}

#[tokio::test]
async fn test_rejected_add_still_broadcasts() {
    let (_dir, addr) = spawn_server().await;
    let mut requester = connect(addr).await;
    let mut observer = connect(addr).await;
    next_event(&mut requester).await;
    next_event(&mut observer).await;

    send_json(
        &mut requester,
        json!({"event": "add_product", "data": {"product": {"code": "P1"}}}),
    )
    .await;

    let reply = next_event(&mut requester).await;
    assert_eq!(reply["event"], "add_product_response");
    assert_eq!(reply["data"]["status"]["status"], "error");
    assert!(reply["data"]["status"]["message"]
        .as_str()
        .unwrap()
        .contains("P1"));

    assert_eq!(snapshot_codes(&next_event(&mut requester).await), vec!["P1"]);
    // The observer only ever sees snapshots
    assert_eq!(snapshot_codes(&next_event(&mut observer).await), vec!["P1"]);
}

#[tokio::test]
async fn test_malformed_frame_gets_error_event() {
    let (_dir, addr) = spawn_server().await;
    let mut client = connect(addr).await;
    next_event(&mut client).await;

    client.send(Message::text("garbage")).await.unwrap();

    let reply = next_event(&mut client).await;
    assert_eq!(reply["event"], "error");
    assert!(reply["data"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid message"));

    // The connection stays usable afterwards
    send_json(
        &mut client,
        json!({"event": "add_product", "data": {"product": {"code": "P3"}}}),
    )
    .await;
    assert_eq!(next_event(&mut client).await["event"], "add_product_response");
}
