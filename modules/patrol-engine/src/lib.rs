//! Dispatch engine.
//!
//! Consumes typed domain events, keeps officers and incidents in an
//! in-memory store, and pairs unassigned incidents with available officers
//! using a greedy nearest-neighbour rule.
//!
//! The engine is single-writer: every mutation goes through `&mut Engine`.
//! Callers that share it across tasks wrap it in a lock and apply each event
//! under one acquisition so readers never observe a half-applied event.

pub mod engine;
pub mod events;
pub mod matching;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod traits;

pub use engine::{DispatchChange, Engine, IngestError};
pub use events::{DecodeError, DispatchEvent};
pub use source::MemoryEventSource;
pub use store::{EntityStore, InvariantViolation};
pub use traits::{EventLike, EventSource};
