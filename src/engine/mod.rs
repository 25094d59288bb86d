//! Rank progression engine
//!
//! Walks one upgrade attempt through `RankExists -> AvailableFromCurrent ->
//! RequirementsMet -> Swapping -> {Committed | RolledBack}`. The engine is
//! the only component that mutates group membership, and the two-step swap
//! (leave current, join target) is the system's only multi-step mutation:
//! if the join fails the engine re-adds the original group and reports
//! failure. Requirement consumption runs only after a committed swap and is
//! never rolled back.

use crate::backend::{
    BackendError, EconomyBackend, MessageKind, NotificationSink, PermissionBackend,
    StatisticsBackend,
};
use crate::core::config::ProgressionConfig;
use crate::core::error::Result;
use crate::core::types::{RankId, RankupOutcome};
use crate::graph::{RankEdge, RankGraph};
use crate::requirement::factory::create_requirement;
use crate::requirement::registry::RequirementRegistry;
use crate::requirement::{PlayerView, Requirement};
use serde_json::json;
use std::sync::Arc;

/// Outcome of one `upgrade_rank` attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// Swap committed. Any entries are descriptions of requirements whose
    /// post-commit consume failed (partial success, logged, not reversed).
    Committed { consume_failures: Vec<String> },
    /// Re-validation failed: unknown target, no edge, or unmet requirements
    NotEligible,
    /// A group mutation failed; membership was restored where possible
    SwapFailed,
}

impl UpgradeStatus {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Evaluates rank edges against live player state and executes the swap
pub struct ProgressionEngine {
    graph: Arc<RankGraph>,
    registry: Arc<RequirementRegistry>,
    permissions: Arc<dyn PermissionBackend>,
    economy: Arc<dyn EconomyBackend>,
    stats: Arc<dyn StatisticsBackend>,
    sink: Arc<dyn NotificationSink>,
    config: ProgressionConfig,
}

impl ProgressionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        graph: Arc<RankGraph>,
        registry: Arc<RequirementRegistry>,
        permissions: Arc<dyn PermissionBackend>,
        economy: Arc<dyn EconomyBackend>,
        stats: Arc<dyn StatisticsBackend>,
        sink: Arc<dyn NotificationSink>,
        config: ProgressionConfig,
    ) -> Self {
        Self {
            graph,
            registry,
            permissions,
            economy,
            stats,
            sink,
            config,
        }
    }

    /// Swap in a freshly loaded graph; in-flight evaluations keep the
    /// snapshot they cloned at entry.
    pub fn reload_graph(&mut self, graph: Arc<RankGraph>) {
        self.graph = graph;
    }

    /// Swap in a freshly populated registry
    pub fn reload_registry(&mut self, registry: Arc<RequirementRegistry>) {
        self.registry = registry;
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    fn view<'a>(&'a self, player: &'a str) -> PlayerView<'a> {
        PlayerView {
            name: player,
            economy: self.economy.as_ref(),
            stats: self.stats.as_ref(),
        }
    }

    /// The player's current primary group (may be empty if unresolvable)
    pub fn current_rank(&self, player: &str) -> std::result::Result<String, BackendError> {
        self.permissions.primary_group(player)
    }

    /// Candidate targets configured from a given rank, in configuration order
    pub fn available_from(&self, rank: &str) -> Vec<(RankId, String)> {
        let graph = Arc::clone(&self.graph);
        graph
            .edges_from(rank)
            .iter()
            .map(|edge| (edge.to.clone(), edge.display_name.clone()))
            .collect()
    }

    /// Candidate targets for the player's current primary group
    pub fn available_ranks(
        &self,
        player: &str,
    ) -> std::result::Result<Vec<(RankId, String)>, BackendError> {
        let current = self.current_rank(player)?;
        Ok(self.available_from(&current))
    }

    /// Materialize an edge's requirements: the cost (when > 0) as a leading
    /// balance requirement, then the configured strings in definition order.
    fn materialize(&self, edge: &RankEdge) -> Result<Vec<Box<dyn Requirement>>> {
        let registry = Arc::clone(&self.registry);
        let mut requirements = Vec::with_capacity(edge.requirement_strings.len() + 1);
        if edge.cost > 0.0 {
            requirements.push(create_requirement(&registry, &format!("balance {}", edge.cost))?);
        }
        for definition in &edge.requirement_strings {
            requirements.push(create_requirement(&registry, definition)?);
        }
        Ok(requirements)
    }

    /// Descriptions of every unmet requirement on the `from -> target` edge.
    ///
    /// All requirements are evaluated (no short-circuit) so the caller can
    /// report the complete list.
    pub fn unmet_requirements(
        &self,
        player: &str,
        from: &str,
        target: &RankId,
    ) -> Result<Vec<String>> {
        let graph = Arc::clone(&self.graph);
        let Some(edge) = graph.edge(from, target) else {
            return Ok(Vec::new());
        };
        let requirements = self.materialize(edge)?;
        let view = self.view(player);
        Ok(requirements
            .iter()
            .filter(|r| !r.is_met(&view))
            .map(|r| r.describe())
            .collect())
    }

    /// Full eligibility check: the target group exists in the backend, an
    /// edge from the player's current rank reaches it, and every
    /// materialized requirement is met.
    pub fn can_upgrade_to(&self, player: &str, target: &RankId) -> bool {
        if !self.permissions.group_exists(target) {
            return false;
        }
        let current = match self.current_rank(player) {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!("Primary group lookup failed for {player}: {e}");
                return false;
            }
        };
        let graph = Arc::clone(&self.graph);
        let Some(edge) = graph.edge(&current, target) else {
            return false;
        };
        let requirements = match self.materialize(edge) {
            Ok(requirements) => requirements,
            Err(e) => {
                tracing::warn!("Cannot materialize requirements for {} -> {target}: {e}", current);
                return false;
            }
        };
        let view = self.view(player);
        requirements.iter().all(|r| r.is_met(&view))
    }

    /// Re-validate eligibility, then execute the two-step group swap.
    ///
    /// Rollback path: when the remove succeeds but the add fails, the
    /// original group is re-added and the attempt reports `SwapFailed`.
    /// After a committed swap every requirement's `consume` runs in
    /// definition order; failures are logged and surfaced, never reversed.
    pub fn upgrade_rank(&self, player: &str, target: &RankId) -> UpgradeStatus {
        if !self.permissions.group_exists(target) {
            tracing::debug!("Rankup rejected: group {target} does not exist");
            return UpgradeStatus::NotEligible;
        }

        let current = match self.current_rank(player) {
            Ok(current) if !current.is_empty() => current,
            Ok(_) => return UpgradeStatus::NotEligible,
            Err(e) => {
                tracing::warn!("Primary group lookup failed for {player}: {e}");
                return UpgradeStatus::NotEligible;
            }
        };

        let graph = Arc::clone(&self.graph);
        let Some(edge) = graph.edge(&current, target) else {
            return UpgradeStatus::NotEligible;
        };

        let requirements = match self.materialize(edge) {
            Ok(requirements) => requirements,
            Err(e) => {
                tracing::warn!("Cannot materialize requirements for {current} -> {target}: {e}");
                return UpgradeStatus::NotEligible;
            }
        };
        let view = self.view(player);
        if !requirements.iter().all(|r| r.is_met(&view)) {
            return UpgradeStatus::NotEligible;
        }

        // Swapping
        let current_rank = RankId::new(current);
        if !self.permissions.remove_from_group(player, &current_rank) {
            tracing::warn!("Rankup failed: could not remove {player} from {current_rank}");
            return UpgradeStatus::SwapFailed;
        }
        if !self.permissions.add_to_group(player, target) {
            // RolledBack: compensate the remove
            if !self.permissions.add_to_group(player, &current_rank) {
                tracing::error!(
                    "Rollback failed: {player} left without a rank after {current_rank} -> {target}"
                );
            } else {
                tracing::warn!(
                    "Rankup rolled back: could not add {player} to {target}, restored {current_rank}"
                );
            }
            return UpgradeStatus::SwapFailed;
        }

        // Committed: apply costs in definition order
        let mut consume_failures = Vec::new();
        for requirement in &requirements {
            if let Err(e) = requirement.consume(&view) {
                tracing::warn!(
                    "Consume failed after committed rankup of {player}: {} ({e})",
                    requirement.describe()
                );
                self.sink.send(
                    MessageKind::ConsumeFailed,
                    json!({
                        "player": player,
                        "requirement": requirement.describe(),
                        "error": e.to_string(),
                    }),
                );
                consume_failures.push(requirement.describe());
            }
        }

        tracing::info!("{player} ranked up: {current_rank} -> {target}");
        UpgradeStatus::Committed { consume_failures }
    }

    /// Announce a committed rankup, gated by configuration. Fire-and-forget.
    pub fn broadcast_rank_upgrade(&self, outcome: &RankupOutcome) {
        if !self.config.broadcast_rankup {
            return;
        }
        self.sink.send(
            MessageKind::RankupBroadcast,
            json!({
                "player": outcome.player.as_str(),
                "from": outcome.previous_rank.as_str(),
                "to": outcome.target_rank.as_str(),
            }),
        );
    }
}
