//! Application-level peer identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LobbyError;

/// Longest peer identifier accepted from a client, in bytes.
pub const MAX_PEER_ID_LEN: usize = 128;

/// String chosen by a client to be handed to its future match partner.
///
/// The lobby never interprets the value; it only compares it for
/// equality and echoes it back inside `match_found`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    /// Validates and wraps a client-supplied identifier.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::InvalidPeerId`] if the trimmed value is empty
    /// or longer than [`MAX_PEER_ID_LEN`] bytes.
    pub fn parse(raw: &str) -> Result<Self, LobbyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LobbyError::InvalidPeerId("peer id is empty".to_string()));
        }
        if trimmed.len() > MAX_PEER_ID_LEN {
            return Err(LobbyError::InvalidPeerId(format!(
                "peer id exceeds {MAX_PEER_ID_LEN} bytes"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let Ok(id) = PeerId::parse("  peer-1 ") else {
            panic!("expected valid peer id");
        };
        assert_eq!(id.as_str(), "peer-1");
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(matches!(
            PeerId::parse("   "),
            Err(LobbyError::InvalidPeerId(_))
        ));
    }

    #[test]
    fn parse_rejects_oversized() {
        let raw = "x".repeat(MAX_PEER_ID_LEN + 1);
        assert!(PeerId::parse(&raw).is_err());
        assert!(PeerId::parse(&"x".repeat(MAX_PEER_ID_LEN)).is_ok());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&PeerId::from("p1")).unwrap_or_default();
        assert_eq!(json, "\"p1\"");
    }
}
