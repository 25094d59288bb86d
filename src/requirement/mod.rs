//! Eligibility requirements for rank transitions
//!
//! A requirement is one unit of eligibility logic: a predicate over live
//! player state plus an optional consumption side effect applied after a
//! committed rankup. Variants are registered by name in the
//! [`registry::RequirementRegistry`] and materialized from definition
//! strings by the [`factory`].

pub mod duration;
pub mod factory;
pub mod materials;
pub mod registry;
pub mod variants;

use crate::backend::{BackendError, EconomyBackend, StatisticsBackend};
use crate::core::types::Tick;
use std::fmt;

/// Concrete variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    Balance,
    Level,
    BlockBreak,
    BlockPlace,
    ItemUse,
    ItemCraft,
    TimePlayed,
    TimeSinceDeath,
}

/// Grammar the factory applies to a definition string's final token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFormat {
    /// Finite number, strictly greater than zero
    Number,
    /// Compact duration string (`M1w2d3h4m5s6`), strictly positive total
    Duration,
}

/// Validated final token of a definition string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    Number(f64),
    Ticks(Tick),
}

/// Read-only view of one player's live state, borrowed for a single
/// evaluation. Holds no ownership and is never cached across commands.
#[derive(Clone, Copy)]
pub struct PlayerView<'a> {
    pub name: &'a str,
    pub economy: &'a dyn EconomyBackend,
    pub stats: &'a dyn StatisticsBackend,
}

impl fmt::Debug for PlayerView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerView").field("name", &self.name).finish()
    }
}

/// One eligibility predicate plus optional consumption side effect
///
/// `is_met` must not panic or propagate: backend failures are logged inside
/// the implementation and treated as "not met".
pub trait Requirement: fmt::Debug {
    fn kind(&self) -> RequirementKind;

    /// Pure read against live player state; fails closed.
    fn is_met(&self, player: &PlayerView<'_>) -> bool;

    /// Cost application after a committed rankup. Default no-op.
    fn consume(&self, _player: &PlayerView<'_>) -> Result<(), BackendError> {
        Ok(())
    }

    /// Human-readable listing entry: `<name>: <identifiers> - <amount>`,
    /// or `<name>: <amount>` for variants without identifiers.
    fn describe(&self) -> String;
}
