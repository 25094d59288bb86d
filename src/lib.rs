//! Ranklift - configurable player rank progression
//!
//! A server operator defines a directed graph of ranks; each edge is gated
//! by requirement definition strings ("balance 1000",
//! "block-break STONE DIRT 100", "time-played h2"). Players request
//! promotion; the engine validates eligibility against live player state
//! through the backend traits and, when satisfied, swaps group membership
//! in two steps with rollback on partial failure.

pub mod backend;
pub mod command;
pub mod core;
pub mod engine;
pub mod graph;
pub mod requirement;
