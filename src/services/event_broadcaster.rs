//! Event broadcaster for admin WebSocket updates.
//!
//! Uses tokio::sync::broadcast to fan-out events to all connected clients.

use tokio::sync::broadcast;

use crate::models::{WsEvent, WsEventMessage};

/// Default capacity for the broadcast channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Distributes shipment events to every subscribed WebSocket session.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<WsEventMessage>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<WsEventMessage> {
        self.sender.subscribe()
    }

    /// Broadcast an event, returning how many receivers got it.
    /// With no subscribers this is a no-op that returns 0.
    pub fn send(&self, event: WsEventMessage) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Timestamp and broadcast an event.
    pub fn publish(&self, event: WsEvent) -> usize {
        self.send(WsEventMessage::new(event))
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
