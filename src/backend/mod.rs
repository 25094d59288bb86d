//! Capability contracts for the external collaborators this core consumes
//!
//! The core owns no persistence, network, or messaging format of its own.
//! Everything player-facing or host-owned is reached through one of these
//! traits: the permission backend (group membership), the economy backend
//! (balances), the statistics backend (per-player counters), and the
//! notification sink (message kind + structured context; localization and
//! templating live behind it).

pub mod memory;

use crate::core::types::RankId;
use serde_json::Value;
use thiserror::Error;

/// Failure reported by an external backend lookup
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Permission backend: primary-group lookup and group membership mutation.
///
/// The progression engine is the only core component that calls the two
/// mutating methods, and only inside its two-step swap.
pub trait PermissionBackend {
    /// The player's current primary group; an empty string means the
    /// backend could not resolve one.
    fn primary_group(&self, player: &str) -> Result<String, BackendError>;

    /// Returns false when the backend rejected the mutation.
    fn add_to_group(&self, player: &str, group: &RankId) -> bool;

    /// Returns false when the backend rejected the mutation.
    fn remove_from_group(&self, player: &str, group: &RankId) -> bool;

    fn group_exists(&self, group: &RankId) -> bool;
}

/// Economy backend: balance lookup and the post-commit debit.
pub trait EconomyBackend {
    fn balance(&self, player: &str) -> Result<f64, BackendError>;

    fn withdraw(&self, player: &str, amount: f64) -> Result<(), BackendError>;
}

/// Per-player counters the statistic requirements read.
///
/// Counters are fixed-width 32-bit values on the host side; they are
/// reported through `i64` so a wrapped counter shows up as negative
/// instead of being silently reinterpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    BlockBreak,
    BlockPlace,
    ItemUse,
    ItemCraft,
    /// Ticks played on this server
    TimePlayed,
    /// Ticks since the player last died
    TimeSinceDeath,
}

/// Player statistics backend
pub trait StatisticsBackend {
    /// A counter value; `qualifier` names the block or item the counter is
    /// keyed by, when the statistic is per-material.
    fn statistic(
        &self,
        player: &str,
        stat: Statistic,
        qualifier: Option<&str>,
    ) -> Result<i64, BackendError>;

    /// The player's experience level
    fn level(&self, player: &str) -> Result<u32, BackendError>;
}

/// Kinds of user-visible messages the core emits
///
/// The sink owns wording, localization, and delivery; the core only picks
/// the kind and supplies the structured context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    PlayerOnly,
    CurrentRankError,
    HighestRank,
    RankupOptions,
    InvalidRank,
    RequirementsNotMet,
    RankupSuccess,
    RankupFailed,
    RankupBroadcast,
    ConsumeFailed,
}

/// Notification sink: fire-and-forget, no retry.
pub trait NotificationSink {
    fn send(&self, kind: MessageKind, context: Value);
}
