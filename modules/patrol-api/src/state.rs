use std::sync::Arc;

use patrol_engine::Engine;
use tokio::sync::RwLock;

use crate::source::EventSender;

/// The engine shared between the consumer (writer) and HTTP readers.
pub type SharedEngine = Arc<RwLock<Engine>>;

pub fn shared_engine() -> SharedEngine {
    Arc::new(RwLock::new(Engine::new()))
}

#[derive(Clone)]
pub struct AppState {
    pub engine: SharedEngine,
    pub events: EventSender,
}

impl AppState {
    pub fn new(engine: SharedEngine, events: EventSender) -> Self {
        Self { engine, events }
    }
}
