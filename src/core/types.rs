//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a permission group representing a progression tier.
///
/// Equality is case-sensitive exact match against the permission backend's
/// primary-group name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankId(pub String);

impl RankId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, used only for matching command arguments
    /// against candidate ranks (backend equality stays case-sensitive).
    pub fn matches_arg(&self, arg: &str) -> bool {
        self.0.eq_ignore_ascii_case(arg)
    }
}

impl fmt::Display for RankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RankId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Fixed-rate time unit for elapsed-time requirements (20 per second)
pub type Tick = u64;

/// Ticks per real-time second
pub const TICKS_PER_SECOND: u64 = 20;

/// Who issued a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    /// A connected player, identified by name
    Player(String),
    /// The server console (or any non-player caller)
    Console,
}

/// Immutable record of one progression attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankupOutcome {
    pub player: String,
    pub previous_rank: RankId,
    pub target_rank: RankId,
    pub succeeded: bool,
}
