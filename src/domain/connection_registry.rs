//! Registry of live connections.
//!
//! [`ConnectionRegistry`] is plain data: it holds no lock of its own and
//! is mutated only from inside the engine's critical section.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::ConnectionId;

/// A live transport connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Transport-assigned identity.
    pub id: ConnectionId,
    /// When the connection was registered.
    pub connected_at: DateTime<Utc>,
}

/// Set of currently connected identities.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id`. Returns `false` (and changes nothing) if it is
    /// already registered.
    pub fn register(&mut self, id: ConnectionId) -> bool {
        if self.connections.contains_key(&id) {
            return false;
        }
        self.connections.insert(
            id,
            Connection {
                id,
                connected_at: Utc::now(),
            },
        );
        true
    }

    /// Removes `id`, returning the connection if it was registered.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<Connection> {
        self.connections.remove(&id)
    }

    /// Number of live connections.
    #[must_use]
    pub fn size(&self) -> usize {
        self.connections.len()
    }
}
