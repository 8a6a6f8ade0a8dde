//! Core traits for the dispatch engine.

use async_trait::async_trait;

/// Events carry a stable type string used for routing and log fields.
pub trait EventLike: Clone + Send + Sync + 'static {
    /// The wire discriminator (`type` field) for this event.
    fn event_type_str(&self) -> &'static str;
}

/// Delivers raw event payloads in arrival order.
///
/// Implemented by the transport collaborators (channels, line readers) and
/// by `MemoryEventSource` for tests. Returns `None` once the source is
/// exhausted or closed; the consumer loop stops there.
#[async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> Option<Vec<u8>>;
}

#[async_trait]
impl<S: EventSource + ?Sized> EventSource for Box<S> {
    async fn next_event(&mut self) -> Option<Vec<u8>> {
        (**self).next_event().await
    }
}
