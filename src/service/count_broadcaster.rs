//! Aggregate counter broadcasts.

use crate::domain::{ConnectionRegistry, EventBus, LobbyEvent, WaitingPool};

/// Publishes population and queue-length counters to every connection.
///
/// Holds nothing but a bus handle. Publishing is fire-and-forget: a
/// receiver that lags or has gone away never affects the others.
#[derive(Debug, Clone)]
pub struct CountBroadcaster {
    event_bus: EventBus,
}

impl CountBroadcaster {
    /// Creates a broadcaster publishing on `event_bus`.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Broadcasts the number of live connections.
    pub fn peer_count(&self, connections: &ConnectionRegistry) {
        let count = connections.size();
        let delivered = self.event_bus.publish(LobbyEvent::PeerCount { count });
        tracing::trace!(count, delivered, "peer count broadcast");
    }

    /// Broadcasts the current queue lengths.
    pub fn queue_counts(&self, waiting: &WaitingPool) {
        let partitions = waiting.counts();
        let delivered = self.event_bus.publish(LobbyEvent::QueueCount {
            count: partitions.total(),
            partitions,
        });
        tracing::trace!(count = partitions.total(), delivered, "queue count broadcast");
    }

    /// Broadcasts both counters.
    pub fn all(&self, connections: &ConnectionRegistry, waiting: &WaitingPool) {
        self.peer_count(connections);
        self.queue_counts(waiting);
    }
}
