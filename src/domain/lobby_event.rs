//! Outbound events produced by the lobby.
//!
//! Every mutation publishes one or more [`LobbyEvent`]s through the
//! [`super::EventBus`]. Broadcast events go to every connection;
//! `MatchFound` is addressed to a single connection.

use serde::Serialize;

use super::{ConnectionId, PeerId, QueueCounts};

/// Event delivered to WebSocket clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LobbyEvent {
    /// A partner was found. Unicast to `connection_id`.
    MatchFound {
        /// Recipient connection. Routing data only, never sent on the wire.
        #[serde(skip)]
        connection_id: ConnectionId,
        /// The partner's peer identifier.
        peer_id: PeerId,
    },

    /// Number of live connections changed.
    PeerCount {
        /// Live connections.
        count: usize,
    },

    /// Waiting queue lengths changed.
    QueueCount {
        /// Total waiting entries across all partitions.
        count: usize,
        /// Per-partition lengths.
        partitions: QueueCounts,
    },
}

impl LobbyEvent {
    /// Returns the recipient for unicast events, `None` for broadcasts.
    #[must_use]
    pub const fn recipient(&self) -> Option<ConnectionId> {
        match self {
            Self::MatchFound { connection_id, .. } => Some(*connection_id),
            Self::PeerCount { .. } | Self::QueueCount { .. } => None,
        }
    }

    /// Returns `true` if the event should be delivered to `connection_id`.
    #[must_use]
    pub fn is_for(&self, connection_id: ConnectionId) -> bool {
        self.recipient().is_none_or(|to| to == connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_found_is_unicast() {
        let me = ConnectionId::new();
        let event = LobbyEvent::MatchFound {
            connection_id: me,
            peer_id: PeerId::from("p2"),
        };
        assert!(event.is_for(me));
        assert!(!event.is_for(ConnectionId::new()));
    }

    #[test]
    fn counts_are_broadcast() {
        let event = LobbyEvent::PeerCount { count: 3 };
        assert!(event.is_for(ConnectionId::new()));
        assert_eq!(event.recipient(), None);
    }

    #[test]
    fn match_found_payload_is_only_the_peer_id() {
        let event = LobbyEvent::MatchFound {
            connection_id: ConnectionId::new(),
            peer_id: PeerId::from("p2"),
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({ "event_type": "match_found", "peer_id": "p2" })
        );
    }

    #[test]
    fn queue_count_serializes_partitions() {
        let event = LobbyEvent::QueueCount {
            count: 3,
            partitions: QueueCounts {
                unspecified: 1,
                a: 2,
                b: 0,
            },
        };
        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["event_type"], "queue_count");
        assert_eq!(json["count"], 3);
        assert_eq!(json["partitions"]["a"], 2);
    }
}
