//! Service layer: matchmaking orchestration.
//!
//! [`MatchEngine`] serializes every lobby mutation, [`RetryScheduler`]
//! drives its periodic sweep, and [`CountBroadcaster`] publishes the
//! aggregate counters through the [`super::domain::EventBus`].

pub mod count_broadcaster;
pub mod match_engine;
pub mod retry_scheduler;

pub use count_broadcaster::CountBroadcaster;
pub use match_engine::{LobbyStats, MatchEngine, MatchOutcome};
pub use retry_scheduler::RetryScheduler;
