//! Rankup command orchestration
//!
//! A single synchronous control flow per command: validate the caller,
//! resolve the target rank, check requirements, invoke the progression
//! engine, and report exactly one terminal signal. Every branch also emits
//! its message kind (with structured context) to the notification sink,
//! which owns wording and localization.

use crate::backend::{MessageKind, NotificationSink};
use crate::core::types::{CommandSource, RankId, RankupOutcome};
use crate::engine::{ProgressionEngine, UpgradeStatus};
use serde_json::json;

/// Terminal outcome of one rankup command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankupSignal {
    /// The caller is not a player
    PlayerOnly,
    /// The player's primary group is empty or could not be resolved
    CurrentRankError,
    /// No outgoing edges from the current rank
    HighestRank,
    /// Multiple candidates and no explicit argument; lists all of them
    ShowOptions(Vec<(RankId, String)>),
    /// The explicit argument matched no candidate
    InvalidRank(String),
    /// Eligibility failed; lists every unmet requirement description
    RequirementsNotMet { target: RankId, unmet: Vec<String> },
    /// Swap committed; `consume_failures` is non-empty on partial success
    Success {
        outcome: RankupOutcome,
        consume_failures: Vec<String>,
    },
    /// The engine reported a swap failure
    Failed { target: RankId },
}

impl RankupSignal {
    /// The definite command result: informational listings count as
    /// success, every error branch as failure.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::HighestRank | Self::ShowOptions(_) | Self::Success { .. }
        )
    }
}

/// Validator -> processor -> notifier for the rankup command.
/// Holds no state of its own.
pub struct RankupCommand<'a> {
    engine: &'a ProgressionEngine,
    sink: &'a dyn NotificationSink,
}

impl<'a> RankupCommand<'a> {
    pub fn new(engine: &'a ProgressionEngine, sink: &'a dyn NotificationSink) -> Self {
        Self { engine, sink }
    }

    /// Run one rankup attempt. `arg` is the optional explicit target rank.
    pub fn execute(&self, source: &CommandSource, arg: Option<&str>) -> RankupSignal {
        let CommandSource::Player(player) = source else {
            self.sink.send(MessageKind::PlayerOnly, json!({}));
            return RankupSignal::PlayerOnly;
        };

        let current = match self.engine.current_rank(player) {
            Ok(current) if !current.is_empty() => current,
            Ok(_) => return self.current_rank_error(player),
            Err(e) => {
                tracing::warn!("Primary group lookup failed for {player}: {e}");
                return self.current_rank_error(player);
            }
        };

        let candidates = self.engine.available_from(&current);
        if candidates.is_empty() {
            self.sink.send(
                MessageKind::HighestRank,
                json!({ "player": player, "rank": current }),
            );
            return RankupSignal::HighestRank;
        }

        if candidates.len() > 1 && arg.is_none() {
            self.sink.send(
                MessageKind::RankupOptions,
                json!({
                    "player": player,
                    "options": options_context(&candidates),
                }),
            );
            return RankupSignal::ShowOptions(candidates);
        }

        let target = match arg {
            None => candidates[0].0.clone(),
            Some(requested) => {
                match candidates.iter().find(|(id, _)| id.matches_arg(requested)) {
                    Some((id, _)) => id.clone(),
                    None => {
                        self.sink.send(
                            MessageKind::InvalidRank,
                            json!({
                                "player": player,
                                "argument": requested,
                                "options": options_context(&candidates),
                            }),
                        );
                        return RankupSignal::InvalidRank(requested.to_string());
                    }
                }
            }
        };

        let unmet = match self.engine.unmet_requirements(player, &current, &target) {
            Ok(unmet) => unmet,
            Err(e) => {
                tracing::error!("Requirement materialization failed for {current} -> {target}: {e}");
                return self.rankup_failed(player, target);
            }
        };
        if !unmet.is_empty() {
            self.sink.send(
                MessageKind::RequirementsNotMet,
                json!({
                    "player": player,
                    "target": target.as_str(),
                    "unmet": unmet,
                }),
            );
            return RankupSignal::RequirementsNotMet { target, unmet };
        }

        match self.engine.upgrade_rank(player, &target) {
            UpgradeStatus::Committed { consume_failures } => {
                let outcome = RankupOutcome {
                    player: player.clone(),
                    previous_rank: RankId::new(current),
                    target_rank: target,
                    succeeded: true,
                };
                self.sink.send(
                    MessageKind::RankupSuccess,
                    json!({
                        "player": outcome.player.as_str(),
                        "from": outcome.previous_rank.as_str(),
                        "to": outcome.target_rank.as_str(),
                        "consume_failures": consume_failures,
                    }),
                );
                self.engine.broadcast_rank_upgrade(&outcome);
                RankupSignal::Success {
                    outcome,
                    consume_failures,
                }
            }
            status => {
                tracing::warn!("Rankup of {player} to {target} failed: {status:?}");
                self.rankup_failed(player, target)
            }
        }
    }

    fn current_rank_error(&self, player: &str) -> RankupSignal {
        self.sink
            .send(MessageKind::CurrentRankError, json!({ "player": player }));
        RankupSignal::CurrentRankError
    }

    fn rankup_failed(&self, player: &str, target: RankId) -> RankupSignal {
        self.sink.send(
            MessageKind::RankupFailed,
            json!({ "player": player, "target": target.as_str() }),
        );
        RankupSignal::Failed { target }
    }
}

fn options_context(candidates: &[(RankId, String)]) -> Vec<serde_json::Value> {
    candidates
        .iter()
        .map(|(id, display)| json!({ "rank": id.as_str(), "display": display }))
        .collect()
}
