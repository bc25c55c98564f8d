//! Live updates to observers. Best effort: the engine logs failures and moves on.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BroadcastError {
    #[error("nobody is listening")]
    NoSubscribers,
}

/// One published update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Fire-and-forget publisher. Implementations must not block.
pub trait Broadcaster: Send + Sync {
    fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), BroadcastError>;
}

/// Fan-out over a tokio broadcast channel; slow subscribers lag instead of blocking us.
#[derive(Clone, Debug)]
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<Update>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Update> {
        self.tx.subscribe()
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<(), BroadcastError> {
        let update = Update {
            topic: topic.to_string(),
            payload,
        };
        self.tx
            .send(update)
            .map(|_| ())
            .map_err(|_| BroadcastError::NoSubscribers)
    }
}
