//! Server-Sent Events support

use crate::runtime::{SessionEvent, SessionSnapshot};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    init: SessionSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Create stream that starts with init event then broadcasts
    let init = futures::stream::once(async move {
        Ok(to_axum_event("init", json!({ "type": "init", "session": init })))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(session_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn session_event_to_axum(event: SessionEvent) -> Event {
    let (event_type, data) = match event {
        SessionEvent::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        SessionEvent::Diagram { diagram } => (
            "diagram",
            json!({
                "type": "diagram",
                "diagram": diagram
            }),
        ),
        SessionEvent::Selection { node_id } => (
            "selection",
            json!({
                "type": "selection",
                "node_id": node_id
            }),
        ),
        SessionEvent::Busy { busy } => (
            "busy",
            json!({
                "type": "busy",
                "busy": busy
            }),
        ),
        SessionEvent::Snapshot { snapshot } => (
            "snapshot",
            json!({
                "type": "snapshot",
                "session": snapshot
            }),
        ),
    };

    to_axum_event(event_type, data)
}

fn to_axum_event(event_type: &str, data: Value) -> Event {
    Event::default().event(event_type).data(data.to_string())
}
