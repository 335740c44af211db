use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::state::AppState;

/// GET /api/events: one `update` event per change, with the cause
/// (`rescan`, `agent-saved` or `registry`) as its data. Lagged receivers
/// skip the events they missed.
pub async fn sse_events(State(app): State<AppState>) -> impl axum::response::IntoResponse {
    let rx = app.event_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| {
        let change = msg.ok()?;
        Some(Ok::<Event, Infallible>(
            Event::default().event("update").data(change.as_str()),
        ))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
