// ABOUTME: Live catalog synchronization hub shared by the WebSocket and SSE endpoints
// ABOUTME: Relays add requests to the store and broadcasts full catalog snapshots to every client

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};
use vitrine_catalog::CatalogStore;
use vitrine_core::{Product, ProductCreateInput};

/// Capacity of the snapshot broadcast channel. Snapshots fully replace the
/// client view, so a lagging client only ever needs the newest one.
pub const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

/// Event name used for catalog snapshots on every transport
pub const CATALOG_SNAPSHOT_EVENT: &str = "catalog_snapshot";

/// The full catalog, pushed on connect and after every change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
}

/// Outcome of an add request, as seen by the requesting client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum AddProductStatus {
    Ok(Product),
    Error(String),
}

/// Frames sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    CatalogSnapshot(CatalogSnapshot),
    AddProductResponse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
        status: AddProductStatus,
    },
    Error {
        message: String,
    },
}

/// Frames sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    AddProduct {
        #[serde(default)]
        request_id: Option<String>,
        product: ProductCreateInput,
    },
}

/// Hub that connects clients to the catalog store
#[derive(Clone)]
pub struct LiveSync {
    store: Arc<CatalogStore>,
    sender: broadcast::Sender<CatalogSnapshot>,
}

impl LiveSync {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        let (sender, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self { store, sender }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    /// Subscribes to future snapshots. Subscribe before sending the initial
    /// snapshot so no change can slip in between.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogSnapshot> {
        self.sender.subscribe()
    }

    /// Number of connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// The current catalog
    pub async fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            products: self.store.get_all().await,
        }
    }

    /// Pushes the current catalog to every subscriber and returns how many
    /// received it
    pub async fn broadcast_snapshot(&self) -> usize {
        let snapshot = self.snapshot().await;
        let count = snapshot.products.len();
        match self.sender.send(snapshot) {
            Ok(receivers) => {
                debug!(receivers, products = count, "Broadcast catalog snapshot");
                receivers
            }
            // No subscribers connected
            Err(_) => 0,
        }
    }

    /// Runs an add request against the store
    pub async fn add_product(&self, input: ProductCreateInput) -> AddProductStatus {
        match self.store.add_product(input).await {
            Ok(product) => AddProductStatus::Ok(product),
            Err(e) => {
                info!(error = %e, "Add product request failed");
                AddProductStatus::Error(e.to_string())
            }
        }
    }

    /// Handles one client frame: the response goes to `reply` only, then a
    /// fresh snapshot goes to everyone whatever the outcome was.
    pub async fn handle_client_message(
        &self,
        message: ClientMessage,
        reply: &mpsc::Sender<ServerEvent>,
    ) {
        match message {
            ClientMessage::AddProduct {
                request_id,
                product,
            } => {
                let status = self.add_product(product).await;
                if reply
                    .send(ServerEvent::AddProductResponse { request_id, status })
                    .await
                    .is_err()
                {
                    debug!("Requester disconnected before the add response was sent");
                }
                self.broadcast_snapshot().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vitrine_catalog::test_utils::test_helpers::{product_input, temp_catalog};

    async fn live_sync() -> (tempfile::TempDir, LiveSync) {
        let (dir, path) = temp_catalog();
        let store = Arc::new(CatalogStore::load(&path).await);
        (dir, LiveSync::new(store))
    }

    #[tokio::test]
    async fn test_successful_add_replies_and_broadcasts() {
        let (_dir, live) = live_sync().await;
        let mut updates = live.subscribe();
        let mut other_client = live.subscribe();
        let (reply, mut replies) = mpsc::channel(4);

        live.handle_client_message(
            ClientMessage::AddProduct {
                request_id: Some("r1".to_string()),
                product: product_input("P1"),
            },
            &reply,
        )
        .await;

        match replies.recv().await.unwrap() {
            ServerEvent::AddProductResponse { request_id, status } => {
                assert_eq!(request_id.as_deref(), Some("r1"));
                assert!(matches!(status, AddProductStatus::Ok(p) if p.id == 1 && p.code == "P1"));
            }
            other => panic!("unexpected reply: {:?}", other),
        }

        assert_eq!(updates.recv().await.unwrap().products.len(), 1);
        assert_eq!(other_client.recv().await.unwrap().products.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_add_still_broadcasts() {
        let (_dir, live) = live_sync().await;
        live.add_product(product_input("P1")).await;
        let mut updates = live.subscribe();
        let (reply, mut replies) = mpsc::channel(4);

        live.handle_client_message(
            ClientMessage::AddProduct {
                request_id: None,
                product: product_input("P1"),
            },
            &reply,
        )
        .await;

        match replies.recv().await.unwrap() {
            ServerEvent::AddProductResponse { status, .. } => {
                assert!(matches!(status, AddProductStatus::Error(msg) if msg.contains("P1")));
            }
            other => panic!("unexpected reply: {:?}", other),
        }
        assert_eq!(updates.recv().await.unwrap().products.len(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers() {
        let (_dir, live) = live_sync().await;
        assert_eq!(live.broadcast_snapshot().await, 0);
    }

    #[test]
    fn test_server_event_wire_format() {
        let event = ServerEvent::CatalogSnapshot(CatalogSnapshot { products: vec![] });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "catalog_snapshot", "data": {"products": []}})
        );

        let event = ServerEvent::AddProductResponse {
            request_id: None,
            status: AddProductStatus::Error("A product with code 'P1' already exists".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "add_product_response",
                "data": {
                    "status": {
                        "status": "error",
                        "message": "A product with code 'P1' already exists"
                    }
                }
            })
        );
    }

    #[test]
    fn test_client_message_parsing() {
        let message: ClientMessage = serde_json::from_value(json!({
            "event": "add_product",
            "data": {
                "request_id": "abc",
                "product": {"title": "Pen", "code": "P1", "price": 1.5, "stock": 10, "category": "office"}
            }
        }))
        .unwrap();

        let ClientMessage::AddProduct {
            request_id,
            product,
        } = message;
        assert_eq!(request_id.as_deref(), Some("abc"));
        assert_eq!(product.code, "P1");
        assert_eq!(product.status, None);
    }
}
