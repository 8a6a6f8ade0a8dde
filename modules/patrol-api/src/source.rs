//! Transport-side event sources.

use std::io::BufRead;

use async_trait::async_trait;
use patrol_engine::EventSource;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Producer half of the consumer queue.
pub type EventSender = mpsc::Sender<Vec<u8>>;

/// Producer handle that does not keep the queue open.
pub type WeakEventSender = mpsc::WeakSender<Vec<u8>>;

/// Bounded queue feeding the consumer. Closes once every sender is dropped.
pub fn event_channel(capacity: usize) -> (EventSender, ChannelEventSource) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, ChannelEventSource { rx })
}

#[derive(Debug)]
pub struct ChannelEventSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

#[async_trait]
impl EventSource for ChannelEventSource {
    async fn next_event(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }
}

/// Forward newline-delimited events from a blocking reader onto the queue.
///
/// Runs on a plain thread (stdin reads cannot be cancelled). Lines are
/// passed through as raw bytes, so a line that is not UTF-8 or not JSON
/// reaches the engine and is dropped there like any malformed event.
/// Blank lines are skipped and a trailing `\r` is stripped. Stops at EOF,
/// on a read error, or once the queue has no strong senders left.
/// Returns the number of payloads forwarded.
pub fn forward_lines<R: BufRead>(reader: R, sender: &WeakEventSender) -> u64 {
    let mut forwarded = 0;
    for segment in reader.split(b'\n') {
        let mut payload = match segment {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Event stream read failed, closing source");
                break;
            }
        };
        if payload.last() == Some(&b'\r') {
            payload.pop();
        }
        if payload.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let Some(tx) = sender.upgrade() else {
            debug!("Consumer queue closed, stopping line reader");
            break;
        };
        if tx.blocking_send(payload).is_err() {
            debug!("Consumer queue closed, stopping line reader");
            break;
        }
        forwarded += 1;
    }
    forwarded
}
