//! Waiting queues: FIFO holding areas for peers seeking a match.
//!
//! [`WaitingQueue`] is one FIFO partition. [`WaitingPool`] owns the
//! unspecified queue plus one queue per [`PartitionKey`] and enforces
//! that a peer identifier occupies at most one entry across all of them.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ConnectionId, PartitionKey, PeerId};

/// A peer currently waiting for a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingEntry {
    /// Identifier handed to the eventual partner.
    pub peer_id: PeerId,
    /// Connection that receives the `match_found` notification.
    pub connection_id: ConnectionId,
    /// Partition the entry waits in (`None` = unspecified queue).
    pub partition: Option<PartitionKey>,
    /// Arrival time. Refreshed when the peer re-arms its request.
    pub enqueued_at: DateTime<Utc>,
}

impl WaitingEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(
        peer_id: PeerId,
        connection_id: ConnectionId,
        partition: Option<PartitionKey>,
    ) -> Self {
        Self {
            peer_id,
            connection_id,
            partition,
            enqueued_at: Utc::now(),
        }
    }
}

/// Single FIFO partition. Entries are kept in arrival order.
#[derive(Debug, Default)]
pub struct WaitingQueue {
    entries: VecDeque<WaitingEntry>,
}

impl WaitingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the back.
    pub fn push(&mut self, entry: WaitingEntry) {
        self.entries.push_back(entry);
    }

    /// Removes and returns the oldest entry whose peer differs from
    /// `exclude`.
    ///
    /// Returns `None` when the queue is empty or holds only `exclude`.
    pub fn dequeue_oldest_eligible(&mut self, exclude: &PeerId) -> Option<WaitingEntry> {
        let idx = self.entries.iter().position(|e| e.peer_id != *exclude)?;
        self.entries.remove(idx)
    }

    /// Removes and returns the two oldest entries, if at least two wait.
    pub fn dequeue_oldest_pair(&mut self) -> Option<(WaitingEntry, WaitingEntry)> {
        if self.entries.len() < 2 {
            return None;
        }
        let first = self.entries.pop_front()?;
        let second = self.entries.pop_front()?;
        Some((first, second))
    }

    /// Removes the entry for `peer_id`, if present.
    pub fn remove_by_peer(&mut self, peer_id: &PeerId) -> Option<WaitingEntry> {
        let idx = self.entries.iter().position(|e| e.peer_id == *peer_id)?;
        self.entries.remove(idx)
    }

    /// Removes every entry owned by `connection_id`.
    pub fn remove_by_connection(&mut self, connection_id: ConnectionId) -> Vec<WaitingEntry> {
        let mut removed = Vec::new();
        self.entries.retain(|e| {
            if e.connection_id == connection_id {
                removed.push(e.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Returns the entry for `peer_id` without removing it.
    #[must_use]
    pub fn get(&self, peer_id: &PeerId) -> Option<&WaitingEntry> {
        self.entries.iter().find(|e| e.peer_id == *peer_id)
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &WaitingEntry> {
        self.entries.iter()
    }

    /// Number of waiting entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-partition queue lengths, as broadcast in `queue_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct QueueCounts {
    /// Entries in the unspecified queue.
    pub unspecified: usize,
    /// Entries waiting with key `a`.
    pub a: usize,
    /// Entries waiting with key `b`.
    pub b: usize,
}

impl QueueCounts {
    /// Total number of waiting entries across all partitions.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.unspecified + self.a + self.b
    }
}

/// All waiting queues, addressed by optional partition key.
#[derive(Debug, Default)]
pub struct WaitingPool {
    unspecified: WaitingQueue,
    a: WaitingQueue,
    b: WaitingQueue,
}

impl WaitingPool {
    /// Creates a pool with every partition empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the queue for `partition`.
    #[must_use]
    pub fn queue(&self, partition: Option<PartitionKey>) -> &WaitingQueue {
        match partition {
            None => &self.unspecified,
            Some(PartitionKey::A) => &self.a,
            Some(PartitionKey::B) => &self.b,
        }
    }

    /// Returns the queue for `partition` mutably.
    pub fn queue_mut(&mut self, partition: Option<PartitionKey>) -> &mut WaitingQueue {
        match partition {
            None => &mut self.unspecified,
            Some(PartitionKey::A) => &mut self.a,
            Some(PartitionKey::B) => &mut self.b,
        }
    }

    /// Appends `entry` to its partition's queue.
    ///
    /// Any existing entry for the same peer, in any partition, is removed
    /// first so the peer re-arms at the back instead of being duplicated.
    /// Returns the replaced entry, if there was one.
    pub fn enqueue(&mut self, entry: WaitingEntry) -> Option<WaitingEntry> {
        let replaced = self.remove_by_peer(&entry.peer_id);
        self.queue_mut(entry.partition).push(entry);
        replaced
    }

    /// Removes and returns the oldest entry in `partition` whose peer
    /// differs from `exclude`.
    pub fn dequeue_oldest_eligible(
        &mut self,
        partition: Option<PartitionKey>,
        exclude: &PeerId,
    ) -> Option<WaitingEntry> {
        self.queue_mut(partition).dequeue_oldest_eligible(exclude)
    }

    /// Removes the entry for `peer_id` from whichever partition holds it.
    pub fn remove_by_peer(&mut self, peer_id: &PeerId) -> Option<WaitingEntry> {
        self.queues_mut()
            .into_iter()
            .find_map(|q| q.remove_by_peer(peer_id))
    }

    /// Removes every entry owned by `connection_id` across all partitions.
    pub fn remove_by_connection(&mut self, connection_id: ConnectionId) -> Vec<WaitingEntry> {
        self.queues_mut()
            .into_iter()
            .flat_map(|q| q.remove_by_connection(connection_id))
            .collect()
    }

    /// Looks up the entry for `peer_id` in any partition.
    #[must_use]
    pub fn get(&self, peer_id: &PeerId) -> Option<&WaitingEntry> {
        [&self.unspecified, &self.a, &self.b]
            .into_iter()
            .find_map(|q| q.get(peer_id))
    }

    /// Returns `true` if any entry references `connection_id`.
    #[must_use]
    pub fn references_connection(&self, connection_id: ConnectionId) -> bool {
        [&self.unspecified, &self.a, &self.b]
            .into_iter()
            .any(|q| q.iter().any(|e| e.connection_id == connection_id))
    }

    /// Current length of every partition.
    #[must_use]
    pub fn counts(&self) -> QueueCounts {
        QueueCounts {
            unspecified: self.unspecified.len(),
            a: self.a.len(),
            b: self.b.len(),
        }
    }

    fn queues_mut(&mut self) -> [&mut WaitingQueue; 3] {
        [&mut self.unspecified, &mut self.a, &mut self.b]
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn entry(peer: &str, partition: Option<PartitionKey>) -> WaitingEntry {
        WaitingEntry::new(PeerId::from(peer), ConnectionId::new(), partition)
    }

    #[test]
    fn dequeue_is_fifo() {
        let mut q = WaitingQueue::new();
        q.push(entry("p1", None));
        q.push(entry("p2", None));
        q.push(entry("p3", None));

        let Some(first) = q.dequeue_oldest_eligible(&PeerId::from("x")) else {
            panic!("expected an entry");
        };
        assert_eq!(first.peer_id.as_str(), "p1");
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn dequeue_skips_excluded_peer() {
        let mut q = WaitingQueue::new();
        q.push(entry("me", None));
        q.push(entry("other", None));

        let Some(got) = q.dequeue_oldest_eligible(&PeerId::from("me")) else {
            panic!("expected an entry");
        };
        assert_eq!(got.peer_id.as_str(), "other");
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn dequeue_returns_none_for_only_self() {
        let mut q = WaitingQueue::new();
        q.push(entry("me", None));
        assert!(q.dequeue_oldest_eligible(&PeerId::from("me")).is_none());
        assert_eq!(q.len(), 1);

        let mut empty = WaitingQueue::new();
        assert!(empty.dequeue_oldest_eligible(&PeerId::from("me")).is_none());
    }

    #[test]
    fn dequeue_pair_needs_two() {
        let mut q = WaitingQueue::new();
        q.push(entry("p1", None));
        assert!(q.dequeue_oldest_pair().is_none());

        q.push(entry("p2", None));
        q.push(entry("p3", None));
        let Some((a, b)) = q.dequeue_oldest_pair() else {
            panic!("expected a pair");
        };
        assert_eq!(a.peer_id.as_str(), "p1");
        assert_eq!(b.peer_id.as_str(), "p2");
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn enqueue_rearms_across_partitions() {
        let mut pool = WaitingPool::new();
        assert!(pool.enqueue(entry("p1", Some(PartitionKey::A))).is_none());
        pool.enqueue(entry("p2", None));

        let replaced = pool.enqueue(entry("p1", None));
        assert!(replaced.is_some());

        let counts = pool.counts();
        assert_eq!(counts.a, 0);
        assert_eq!(counts.unspecified, 2);

        // Re-armed entry goes to the back.
        let order: Vec<&str> = pool.queue(None).iter().map(|e| e.peer_id.as_str()).collect();
        assert_eq!(order, vec!["p2", "p1"]);
    }

    #[test]
    fn remove_by_connection_clears_all_partitions() {
        let mut pool = WaitingPool::new();
        let conn = ConnectionId::new();
        pool.enqueue(WaitingEntry::new(PeerId::from("p1"), conn, None));
        pool.enqueue(WaitingEntry::new(
            PeerId::from("p2"),
            conn,
            Some(PartitionKey::B),
        ));
        pool.enqueue(entry("p3", None));

        let removed = pool.remove_by_connection(conn);
        assert_eq!(removed.len(), 2);
        assert!(!pool.references_connection(conn));
        assert_eq!(pool.counts().total(), 1);
    }

    #[test]
    fn removals_of_absent_entries_are_noops() {
        let mut pool = WaitingPool::new();
        assert!(pool.remove_by_peer(&PeerId::from("ghost")).is_none());
        assert!(pool.remove_by_connection(ConnectionId::new()).is_empty());
        assert_eq!(pool.counts(), QueueCounts::default());
    }
}
