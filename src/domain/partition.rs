//! Partition keys for crosswise matching.
//!
//! A request without a key lands in the single unspecified queue. A
//! request with a key searches the queue of the [`opposite`] key and, if
//! nothing is waiting there, waits in its own key's queue.
//!
//! [`opposite`]: PartitionKey::opposite

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of partition values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartitionKey {
    /// First side of the pairing.
    A,
    /// Second side of the pairing.
    B,
}

impl PartitionKey {
    /// Returns the key whose queue this key is matched against.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Parses a wire value, case-insensitively.
    ///
    /// Unknown values yield `None`, which callers treat as "unspecified"
    /// so a malformed key still gets a match through the shared queue.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            _ => None,
        }
    }

    /// Returns the wire name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
