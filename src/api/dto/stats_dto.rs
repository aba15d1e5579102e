//! Lobby statistics DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::QueueCounts;
use crate::service::LobbyStats;

/// Response body for `GET /api/v1/stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Live WebSocket connections.
    pub peer_count: usize,
    /// Waiting entries per partition.
    pub queue: QueueCounts,
    /// Waiting entries across all partitions.
    pub total_waiting: usize,
}

impl From<LobbyStats> for StatsResponse {
    fn from(stats: LobbyStats) -> Self {
        Self {
            peer_count: stats.peer_count,
            queue: stats.queue,
            total_waiting: stats.queue.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_sum_of_partitions() {
        let response = StatsResponse::from(LobbyStats {
            peer_count: 5,
            queue: QueueCounts {
                unspecified: 1,
                a: 2,
                b: 0,
            },
        });
        assert_eq!(response.total_waiting, 3);

        let json = serde_json::to_value(&response).unwrap_or_default();
        assert_eq!(json["peer_count"], 5);
        assert_eq!(json["queue"]["unspecified"], 1);
    }
}
