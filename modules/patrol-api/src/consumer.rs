//! The single-writer consumer loop.

use patrol_engine::EventSource;
use tracing::{debug, info, Level};

use crate::state::SharedEngine;

/// Apply every payload from `source` to the engine, in delivery order.
///
/// Each event is handled under one write-lock acquisition, so readers see
/// it fully applied or not at all. Malformed events are dropped by the
/// engine and never stop the loop. Returns once the source closes, with
/// the number of payloads received.
pub async fn run_consumer<S: EventSource>(mut source: S, engine: SharedEngine) -> u64 {
    info!("Started event consumer");
    let mut received = 0;

    while let Some(payload) = source.next_event().await {
        received += 1;
        debug!(payload = %String::from_utf8_lossy(&payload), "Received a message");

        let mut guard = engine.write().await;
        let changes = guard.process(&payload);
        let state = tracing::enabled!(Level::DEBUG)
            .then(|| serde_json::to_string(&guard.snapshot()).unwrap_or_default());
        drop(guard);

        if !changes.is_empty() {
            debug!(changes = ?changes, "Event applied");
        }
        if let Some(state) = state {
            debug!(%state, "State after event");
        }
    }

    info!(received, "Event source closed, consumer stopped");
    received
}
