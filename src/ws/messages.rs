//! WebSocket message types: envelope, commands, and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{LobbyEvent, PartitionKey, PeerId};
use crate::error::LobbyError;
use crate::service::MatchOutcome;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped with the current time.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Wraps a lobby event for delivery.
    #[must_use]
    pub fn event(event: &LobbyEvent) -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            WsMessageType::Event,
            serde_json::to_value(event).unwrap_or_default(),
        )
    }

    /// Wraps an error as a reply to request `id`.
    #[must_use]
    pub fn error(id: String, err: &LobbyError) -> Self {
        let body = err.to_body();
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({
                "code": body.code,
                "message": body.message,
            }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands carried in a `command` envelope's payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Ask to be paired with another peer.
    FindMatch {
        /// Identifier to hand to the partner.
        peer_id: String,
        /// Optional partition key. Unknown values mean "unspecified".
        #[serde(default)]
        partition: Option<serde_json::Value>,
    },
    /// Stop waiting for a partner.
    EndChat {
        /// Identifier used in the earlier `find_match`.
        peer_id: String,
    },
}

/// A validated command ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyCommand {
    /// Validated `find_match`.
    FindMatch {
        /// Requesting peer.
        peer_id: PeerId,
        /// Resolved partition (`None` = unspecified).
        partition: Option<PartitionKey>,
    },
    /// Validated `end_chat`.
    EndChat {
        /// Withdrawing peer.
        peer_id: PeerId,
    },
}

impl TryFrom<WsCommand> for LobbyCommand {
    type Error = LobbyError;

    fn try_from(command: WsCommand) -> Result<Self, Self::Error> {
        match command {
            WsCommand::FindMatch { peer_id, partition } => Ok(Self::FindMatch {
                peer_id: PeerId::parse(&peer_id)?,
                partition: partition
                    .as_ref()
                    .and_then(serde_json::Value::as_str)
                    .and_then(PartitionKey::parse_lenient),
            }),
            WsCommand::EndChat { peer_id } => Ok(Self::EndChat {
                peer_id: PeerId::parse(&peer_id)?,
            }),
        }
    }
}

/// Parses a raw text frame into its request id and validated command.
///
/// The request id is returned even on failure so the error reply can be
/// correlated, when the envelope itself was readable.
///
/// # Errors
///
/// Returns [`LobbyError::MalformedMessage`] for unreadable JSON,
/// [`LobbyError::UnknownCommand`] for an unrecognised `command`, and
/// [`LobbyError::InvalidPeerId`] for a bad peer identifier.
pub fn parse_command(text: &str) -> (String, Result<LobbyCommand, LobbyError>) {
    let msg = match serde_json::from_str::<WsMessage>(text) {
        Ok(msg) => msg,
        Err(err) => {
            return (String::new(), Err(LobbyError::MalformedMessage(err.to_string())));
        }
    };

    if msg.msg_type != WsMessageType::Command {
        return (
            msg.id,
            Err(LobbyError::MalformedMessage(
                "expected a message of type \"command\"".to_string(),
            )),
        );
    }

    let name = msg
        .payload
        .get("command")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let result = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(command) => LobbyCommand::try_from(command),
        Err(_) if !matches!(name.as_str(), "find_match" | "end_chat") => {
            Err(LobbyError::UnknownCommand(name))
        }
        Err(err) => Err(LobbyError::MalformedMessage(err.to_string())),
    };
    (msg.id, result)
}

/// Builds the response payload for a completed `find_match`.
#[must_use]
pub fn find_match_response(outcome: &MatchOutcome) -> serde_json::Value {
    match outcome {
        MatchOutcome::Matched { .. } => serde_json::json!({ "status": "matched" }),
        MatchOutcome::Waiting => serde_json::json!({ "status": "waiting" }),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn command(payload: serde_json::Value) -> String {
        serde_json::json!({ "id": "req-1", "type": "command", "payload": payload }).to_string()
    }

    #[test]
    fn parses_find_match_with_partition() {
        let (id, result) = parse_command(&command(serde_json::json!({
            "command": "find_match",
            "peer_id": "p1",
            "partition": "B",
        })));
        assert_eq!(id, "req-1");
        let Ok(LobbyCommand::FindMatch { peer_id, partition }) = result else {
            panic!("expected find_match");
        };
        assert_eq!(peer_id.as_str(), "p1");
        assert_eq!(partition, Some(PartitionKey::B));
    }

    #[test]
    fn malformed_partition_means_unspecified() {
        let (_, result) = parse_command(&command(serde_json::json!({
            "command": "find_match",
            "peer_id": "p1",
            "partition": "female",
        })));
        let Ok(LobbyCommand::FindMatch { partition, .. }) = result else {
            panic!("expected find_match");
        };
        assert_eq!(partition, None);

        let (_, result) = parse_command(&command(serde_json::json!({
            "command": "find_match",
            "peer_id": "p1",
            "partition": 7,
        })));
        assert!(matches!(
            result,
            Ok(LobbyCommand::FindMatch {
                partition: None,
                ..
            })
        ));
    }

    #[test]
    fn parses_end_chat() {
        let (_, result) = parse_command(&command(serde_json::json!({
            "command": "end_chat",
            "peer_id": "p1",
        })));
        assert!(matches!(result, Ok(LobbyCommand::EndChat { .. })));
    }

    #[test]
    fn rejects_garbage_and_unknown_commands() {
        let (id, result) = parse_command("not json");
        assert!(id.is_empty());
        assert!(matches!(result, Err(LobbyError::MalformedMessage(_))));

        let (_, result) = parse_command(&command(serde_json::json!({ "command": "dance" })));
        assert!(matches!(result, Err(LobbyError::UnknownCommand(_))));

        let (_, result) = parse_command(&command(serde_json::json!({ "command": "find_match" })));
        assert!(matches!(result, Err(LobbyError::MalformedMessage(_))));
    }

    #[test]
    fn rejects_blank_peer_id() {
        let (_, result) = parse_command(&command(serde_json::json!({
            "command": "find_match",
            "peer_id": "  ",
        })));
        assert!(matches!(result, Err(LobbyError::InvalidPeerId(_))));
    }

    #[test]
    fn event_envelope_carries_event_type() {
        let msg = WsMessage::event(&LobbyEvent::PeerCount { count: 4 });
        assert_eq!(msg.msg_type, WsMessageType::Event);
        assert_eq!(msg.payload["event_type"], "peer_count");
        assert_eq!(msg.payload["count"], 4);
    }
}
