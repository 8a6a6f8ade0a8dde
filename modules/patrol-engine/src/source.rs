//! In-memory `EventSource` for tests and replays.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::traits::EventSource;

/// Replays a fixed list of payloads, then reports exhaustion.
#[derive(Debug, Default)]
pub struct MemoryEventSource {
    pending: VecDeque<Vec<u8>>,
}

impl MemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON value as the next payload.
    pub fn push_json(&mut self, value: &serde_json::Value) -> &mut Self {
        self.pending.push_back(value.to_string().into_bytes());
        self
    }

    /// Queue raw bytes, well-formed or not.
    pub fn push_raw(&mut self, payload: impl Into<Vec<u8>>) -> &mut Self {
        self.pending.push_back(payload.into());
        self
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FromIterator<serde_json::Value> for MemoryEventSource {
    fn from_iter<I: IntoIterator<Item = serde_json::Value>>(values: I) -> Self {
        let mut source = Self::new();
        for value in values {
            source.push_json(&value);
        }
        source
    }
}

#[async_trait]
impl EventSource for MemoryEventSource {
    async fn next_event(&mut self) -> Option<Vec<u8>> {
        self.pending.pop_front()
    }
}
