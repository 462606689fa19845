// ABOUTME: Server-Sent Events stream of catalog snapshots
// ABOUTME: Read-only alternative to the WebSocket channel for clients that only display the catalog

use crate::connections::LiveConnectionGuard;
use crate::live::{CatalogSnapshot, CATALOG_SNAPSHOT_EVENT};
use crate::response::ApiError;
use crate::AppState;
use axum::{
    extract::{ConnectInfo, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{error, info};

/// Wrapper that keeps the connection slot until the stream is dropped
pub struct GuardedSseStream<S> {
    stream: Pin<Box<S>>,
    _guard: LiveConnectionGuard,
}

impl<S> GuardedSseStream<S> {
    pub fn new(stream: S, guard: LiveConnectionGuard) -> Self {
        Self {
            stream: Box::pin(stream),
            _guard: guard,
        }
    }
}

impl<S, T, E> Stream for GuardedSseStream<S>
where
    S: Stream<Item = Result<T, E>>,
{
    type Item = Result<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}

/// Helper to create SSE response with standard keep-alive settings
pub fn create_sse_response<S>(stream: S) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    S: Stream<Item = Result<Event, Infallible>> + Send + 'static,
{
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Helper to create an SSE event from JSON-serializable data
pub fn create_sse_event<T: serde::Serialize>(
    event_type: &str,
    data: &T,
) -> Result<Event, serde_json::Error> {
    let json_data = serde_json::to_string(data)?;

    Ok(Event::default().event(event_type).data(json_data))
}

fn snapshot_event(snapshot: &CatalogSnapshot) -> Event {
    create_sse_event(CATALOG_SNAPSHOT_EVENT, snapshot).unwrap_or_else(|e| {
        error!(error = %e, "Failed to serialize catalog snapshot");
        Event::default().event("error").data(r#"{"error":"snapshot unavailable"}"#)
    })
}

/// GET /api/products/stream - initial snapshot, then one snapshot per change
pub async fn catalog_stream(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, ApiError> {
    let guard = state
        .connections
        .try_acquire(addr.ip())
        .map_err(|_| ApiError::TooManyConnections)?;

    let updates = BroadcastStream::new(state.live.subscribe()).filter_map(|result| result.ok());
    let initial = state.live.snapshot().await;
    info!(client = %addr, "SSE catalog stream opened");

    let events = tokio_stream::once(initial)
        .chain(updates)
        .map(|snapshot| Ok::<_, Infallible>(snapshot_event(&snapshot)));

    Ok(create_sse_response(GuardedSseStream::new(events, guard)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sse_event() {
        let snapshot = CatalogSnapshot { products: vec![] };
        let event = create_sse_event(CATALOG_SNAPSHOT_EVENT, &snapshot);
        assert!(event.is_ok());
    }
}
