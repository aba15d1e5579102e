//! Broadcast channel for lobby events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The engine
//! publishes every [`LobbyEvent`] here and each WebSocket connection
//! holds one receiver, keeping the events addressed to it.

use tokio::sync::broadcast;

use super::LobbyEvent;

/// Broadcast bus for [`LobbyEvent`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// A slow receiver lags and loses its oldest events; it never blocks the
/// publisher or other receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LobbyEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that got the event. With no
    /// receivers the event is silently dropped.
    pub fn publish(&self, event: LobbyEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will see all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LobbyEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(LobbyEvent::PeerCount { count: 1 }), 0);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.publish(LobbyEvent::PeerCount { count: 2 }), 2);

        let Ok(e1) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(e2) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(e1, e2);
    }

    #[test]
    fn dropped_receiver_does_not_block_others() {
        let bus = EventBus::new(16);
        let rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        drop(rx1);

        assert_eq!(bus.publish(LobbyEvent::PeerCount { count: 1 }), 1);
        assert!(rx2.try_recv().is_ok());
    }
}
