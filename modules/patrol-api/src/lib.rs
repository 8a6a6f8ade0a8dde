//! HTTP and transport boundary around the dispatch engine.
//!
//! One consumer task owns all writes: it pulls payloads from an
//! `EventSource` and applies each under the engine's write lock. HTTP
//! handlers only take the read lock to copy a snapshot, or push raw
//! payloads onto the consumer's queue.

pub mod consumer;
pub mod routes;
pub mod source;
pub mod state;

pub use consumer::run_consumer;
pub use routes::build_router;
pub use source::{event_channel, forward_lines, ChannelEventSource, EventSender, WeakEventSender};
pub use state::{AppState, SharedEngine};
