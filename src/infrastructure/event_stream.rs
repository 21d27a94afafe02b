// Server-sent event streaming utilities
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;

/// Yield `initial`, then every mapped message from the receiver until the
/// sender goes away or `shutdown` turns true. Lagging receivers skip ahead
/// instead of ending.
pub fn forward_from_receiver<T, U, F>(
    initial: U,
    mut rx: broadcast::Receiver<T>,
    mut shutdown: watch::Receiver<bool>,
    map: F,
) -> impl Stream<Item = U>
where
    T: Clone + Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> Option<U> + Send + 'static,
{
    async_stream::stream! {
        yield initial;
        while !*shutdown.borrow_and_update() {
            let next = tokio::select! {
                result = rx.recv() => Some(result),
                // A dropped sender also ends the stream.
                _ = shutdown.changed() => None,
            };
            match next {
                None => break,
                Some(Ok(msg)) => {
                    if let Some(item) = map(msg) {
                        yield item;
                    }
                }
                Some(Err(RecvError::Lagged(skipped))) => {
                    tracing::warn!("Event stream client lagged, {} updates dropped", skipped);
                }
                Some(Err(RecvError::Closed)) => break,
            }
        }
    }
}

/// Build an SSE response from a broadcast receiver
pub fn sse_from_receiver<T, F>(
    initial: Event,
    rx: broadcast::Receiver<T>,
    shutdown: watch::Receiver<bool>,
    to_event: F,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Clone + Send + 'static,
    F: Fn(T) -> Option<Event> + Send + 'static,
{
    let stream = forward_from_receiver(Ok(initial), rx, shutdown, move |msg| to_event(msg).map(Ok));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Named SSE event with a JSON payload
pub fn json_event<T: Serialize>(name: &str, data: &T) -> Option<Event> {
    match Event::default().event(name).json_data(data) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::error!("Failed to serialize {} event: {}", name, e);
            None
        }
    }
}
