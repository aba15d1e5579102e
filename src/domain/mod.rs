//! Domain layer: identifiers, queues, connection registry, and events.
//!
//! Everything here is plain data with no locking of its own. The
//! service layer wraps it in a single critical section.

pub mod connection_id;
pub mod connection_registry;
pub mod event_bus;
pub mod lobby_event;
pub mod partition;
pub mod peer_id;
pub mod waiting_queue;

pub use connection_id::ConnectionId;
pub use connection_registry::{Connection, ConnectionRegistry};
pub use event_bus::EventBus;
pub use lobby_event::LobbyEvent;
pub use partition::PartitionKey;
pub use peer_id::PeerId;
pub use waiting_queue::{QueueCounts, WaitingEntry, WaitingPool, WaitingQueue};
