//! WebSocket layer: the lobby's transport adapter.
//!
//! The endpoint at `/ws` accepts `find_match` and `end_chat` commands
//! and pushes `match_found`, `peer_count`, and `queue_count` events.

pub mod connection;
pub mod handler;
pub mod messages;
