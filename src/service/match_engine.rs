//! Match engine: pairs waiting peers and keeps lobby bookkeeping.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use super::CountBroadcaster;
use crate::domain::{
    ConnectionId, ConnectionRegistry, EventBus, LobbyEvent, PartitionKey, PeerId, QueueCounts,
    WaitingEntry, WaitingPool,
};

/// Result of a `find_match` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Paired immediately with the given peer.
    Matched {
        /// Partner's peer identifier.
        peer_id: PeerId,
    },
    /// No eligible partner; the request now waits in a queue.
    Waiting,
}

/// Point-in-time counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LobbyStats {
    /// Live connections.
    pub peer_count: usize,
    /// Waiting entries per partition.
    pub queue: QueueCounts,
}

/// Registry and queues, mutated only while the engine lock is held.
#[derive(Debug, Default)]
struct LobbyState {
    connections: ConnectionRegistry,
    waiting: WaitingPool,
}

/// The matchmaking engine.
///
/// All client events and sweep ticks run through one
/// [`tokio::sync::Mutex`] guarding the connection registry and every
/// waiting queue together. Events are published while the lock is still
/// held, so both entries of a match leave their queues before either
/// notification goes out and counters reach clients in mutation order.
#[derive(Debug)]
pub struct MatchEngine {
    state: Mutex<LobbyState>,
    event_bus: EventBus,
    broadcaster: CountBroadcaster,
    scheduler_attached: AtomicBool,
}

impl MatchEngine {
    /// Creates an engine publishing on `event_bus`.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            state: Mutex::new(LobbyState::default()),
            broadcaster: CountBroadcaster::new(event_bus.clone()),
            event_bus,
            scheduler_attached: AtomicBool::new(false),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Registers a new connection. Duplicate registrations are ignored.
    pub async fn connect(&self, connection_id: ConnectionId) {
        let mut state = self.state.lock().await;
        if !state.connections.register(connection_id) {
            tracing::debug!(%connection_id, "duplicate connect ignored");
            return;
        }
        tracing::info!(
            %connection_id,
            peers = state.connections.size(),
            "peer connected"
        );
        self.broadcaster.all(&state.connections, &state.waiting);
    }

    /// Forgets a connection and every waiting entry it owns.
    ///
    /// Unknown connections are a no-op.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let mut state = self.state.lock().await;
        let was_registered = state.connections.unregister(connection_id).is_some();
        let withdrawn = state.waiting.remove_by_connection(connection_id);
        if !was_registered && withdrawn.is_empty() {
            return;
        }
        tracing::info!(
            %connection_id,
            withdrawn = withdrawn.len(),
            peers = state.connections.size(),
            "peer disconnected"
        );
        self.broadcaster.all(&state.connections, &state.waiting);
    }

    /// Pairs `peer_id` with the oldest eligible waiting peer, or queues it.
    ///
    /// Any entry the peer already holds is dropped first, so a repeated
    /// request re-arms at the back of the queue. With a partition key the
    /// opposite key's queue is searched; without one, the shared queue.
    pub async fn find_match(
        &self,
        peer_id: PeerId,
        connection_id: ConnectionId,
        partition: Option<PartitionKey>,
    ) -> MatchOutcome {
        let mut state = self.state.lock().await;

        if let Some(stale) = state.waiting.remove_by_peer(&peer_id) {
            tracing::debug!(%peer_id, since = %stale.enqueued_at, "re-arming match request");
        }

        let arrival = WaitingEntry::new(peer_id, connection_id, partition);
        let target = partition.map(PartitionKey::opposite);

        let outcome = match state
            .waiting
            .dequeue_oldest_eligible(target, &arrival.peer_id)
        {
            Some(partner) => {
                self.deliver_match(&arrival, &partner);
                MatchOutcome::Matched {
                    peer_id: partner.peer_id,
                }
            }
            None => {
                tracing::debug!(
                    peer_id = %arrival.peer_id,
                    partition = ?arrival.partition,
                    "no partner available, waiting"
                );
                state.waiting.enqueue(arrival);
                MatchOutcome::Waiting
            }
        };

        self.broadcaster.queue_counts(&state.waiting);
        outcome
    }

    /// Withdraws a waiting peer. Returns `false` if it was not waiting.
    pub async fn end_chat(&self, peer_id: &PeerId) -> bool {
        let mut state = self.state.lock().await;
        let Some(entry) = state.waiting.remove_by_peer(peer_id) else {
            return false;
        };
        tracing::debug!(%peer_id, connection_id = %entry.connection_id, "peer withdrew");
        self.broadcaster.queue_counts(&state.waiting);
        true
    }

    /// Pairs off the unspecified queue oldest-first until fewer than two
    /// entries remain. Returns the number of matches formed.
    ///
    /// Partitioned queues are left alone; they rely on matching at arrival.
    pub async fn sweep(&self) -> usize {
        let mut state = self.state.lock().await;
        let mut pairs = 0usize;
        while let Some((first, second)) = state.waiting.queue_mut(None).dequeue_oldest_pair() {
            self.deliver_match(&first, &second);
            pairs += 1;
        }
        if pairs > 0 {
            tracing::debug!(pairs, "sweep paired waiting peers");
            self.broadcaster.queue_counts(&state.waiting);
        }
        pairs
    }

    /// Returns the current counters.
    pub async fn stats(&self) -> LobbyStats {
        let state = self.state.lock().await;
        LobbyStats {
            peer_count: state.connections.size(),
            queue: state.waiting.counts(),
        }
    }

    /// Returns a copy of the waiting entry for `peer_id`, if any.
    #[cfg(test)]
    pub(crate) async fn waiting_entry(&self, peer_id: &PeerId) -> Option<WaitingEntry> {
        self.state.lock().await.waiting.get(peer_id).cloned()
    }

    /// Returns `true` if any waiting entry belongs to `connection_id`.
    #[cfg(test)]
    pub(crate) async fn has_waiting_entries(&self, connection_id: ConnectionId) -> bool {
        self.state
            .lock()
            .await
            .waiting
            .references_connection(connection_id)
    }

    /// Marks a retry scheduler as attached. Returns `false` if one
    /// already is.
    pub(crate) fn attach_scheduler(&self) -> bool {
        self.scheduler_attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Releases the scheduler slot taken by [`Self::attach_scheduler`].
    pub(crate) fn detach_scheduler(&self) {
        self.scheduler_attached.store(false, Ordering::Release);
    }

    /// Places an entry straight into its queue, bypassing arrival matching.
    #[cfg(test)]
    pub(crate) async fn seed_waiting(&self, entry: WaitingEntry) {
        self.state.lock().await.waiting.enqueue(entry);
    }

    /// Notifies both sides of a match. Both entries are already out of
    /// every queue when this runs.
    fn deliver_match(&self, a: &WaitingEntry, b: &WaitingEntry) {
        tracing::info!(peer_a = %a.peer_id, peer_b = %b.peer_id, "match found");
        let _ = self.event_bus.publish(LobbyEvent::MatchFound {
            connection_id: a.connection_id,
            peer_id: b.peer_id.clone(),
        });
        let _ = self.event_bus.publish(LobbyEvent::MatchFound {
            connection_id: b.connection_id,
            peer_id: a.peer_id.clone(),
        });
    }
}
