//! Built-in requirement variants
//!
//! Every variant evaluates against a [`PlayerView`] and fails closed: a
//! backend error inside `is_met` is logged and counts as "not met".

use crate::backend::{BackendError, Statistic};
use crate::core::error::{RankError, Result};
use crate::core::types::Tick;
use crate::requirement::materials::{self, MaterialKind};
use crate::requirement::registry::RequirementDefinition;
use crate::requirement::{Amount, AmountFormat, PlayerView, Requirement, RequirementKind};

/// Every built-in definition, in registration order
pub fn builtin_definitions() -> Vec<RequirementDefinition> {
    vec![
        RequirementDefinition {
            name: "balance",
            kind: RequirementKind::Balance,
            min_params: 1,
            max_params: 1,
            usage: "balance <amount>",
            amount_format: AmountFormat::Number,
            ctor: new_balance,
        },
        RequirementDefinition {
            name: "level",
            kind: RequirementKind::Level,
            min_params: 1,
            max_params: 1,
            usage: "level <amount>",
            amount_format: AmountFormat::Number,
            ctor: new_level,
        },
        RequirementDefinition {
            name: "block-break",
            kind: RequirementKind::BlockBreak,
            min_params: 2,
            max_params: usize::MAX,
            usage: "block-break <block>... <amount>",
            amount_format: AmountFormat::Number,
            ctor: new_block_break,
        },
        RequirementDefinition {
            name: "block-place",
            kind: RequirementKind::BlockPlace,
            min_params: 2,
            max_params: usize::MAX,
            usage: "block-place <block>... <amount>",
            amount_format: AmountFormat::Number,
            ctor: new_block_place,
        },
        RequirementDefinition {
            name: "item-use",
            kind: RequirementKind::ItemUse,
            min_params: 2,
            max_params: usize::MAX,
            usage: "item-use <item>... <amount>",
            amount_format: AmountFormat::Number,
            ctor: new_item_use,
        },
        RequirementDefinition {
            name: "item-craft",
            kind: RequirementKind::ItemCraft,
            min_params: 2,
            max_params: usize::MAX,
            usage: "item-craft <item>... <amount>",
            amount_format: AmountFormat::Number,
            ctor: new_item_craft,
        },
        RequirementDefinition {
            name: "time-played",
            kind: RequirementKind::TimePlayed,
            min_params: 1,
            max_params: 1,
            usage: "time-played <duration>",
            amount_format: AmountFormat::Duration,
            ctor: new_time_played,
        },
        RequirementDefinition {
            name: "time-since-death",
            kind: RequirementKind::TimeSinceDeath,
            min_params: 1,
            max_params: 1,
            usage: "time-since-death <duration>",
            amount_format: AmountFormat::Duration,
            ctor: new_time_since_death,
        },
    ]
}

fn expect_number(name: &'static str, amount: Amount) -> Result<f64> {
    match amount {
        Amount::Number(n) => Ok(n),
        Amount::Ticks(_) => Err(RankError::InvalidAmount {
            name: name.to_string(),
            token: "<duration>".to_string(),
            reason: "expected a numeric amount".to_string(),
        }),
    }
}

fn expect_ticks(name: &'static str, amount: Amount) -> Result<Tick> {
    match amount {
        Amount::Ticks(t) => Ok(t),
        Amount::Number(_) => Err(RankError::InvalidAmount {
            name: name.to_string(),
            token: "<number>".to_string(),
            reason: "expected a duration amount".to_string(),
        }),
    }
}

// === Balance ===

/// Met iff economy balance >= amount; consumed by debiting the amount.
#[derive(Debug)]
pub struct BalanceRequirement {
    amount: f64,
}

fn new_balance(_params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    Ok(Box::new(BalanceRequirement {
        amount: expect_number("balance", amount)?,
    }))
}

impl Requirement for BalanceRequirement {
    fn kind(&self) -> RequirementKind {
        RequirementKind::Balance
    }

    fn is_met(&self, player: &PlayerView<'_>) -> bool {
        match player.economy.balance(player.name) {
            Ok(balance) => balance >= self.amount,
            Err(e) => {
                tracing::warn!("Balance lookup failed for {}: {e}", player.name);
                false
            }
        }
    }

    fn consume(&self, player: &PlayerView<'_>) -> std::result::Result<(), BackendError> {
        player.economy.withdraw(player.name, self.amount)
    }

    fn describe(&self) -> String {
        format!("balance: {}", self.amount)
    }
}

// === Level ===

/// Met iff the player's experience level >= amount
#[derive(Debug)]
pub struct LevelRequirement {
    amount: f64,
}

fn new_level(_params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    Ok(Box::new(LevelRequirement {
        amount: expect_number("level", amount)?,
    }))
}

impl Requirement for LevelRequirement {
    fn kind(&self) -> RequirementKind {
        RequirementKind::Level
    }

    fn is_met(&self, player: &PlayerView<'_>) -> bool {
        match player.stats.level(player.name) {
            Ok(level) => f64::from(level) >= self.amount,
            Err(e) => {
                tracing::warn!("Level lookup failed for {}: {e}", player.name);
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("level: {}", self.amount)
    }
}

// === Material-keyed statistics ===

/// Met iff EVERY named identifier's counter >= amount (logical AND,
/// never a sum across identifiers).
#[derive(Debug)]
pub struct StatisticRequirement {
    kind: RequirementKind,
    name: &'static str,
    stat: Statistic,
    identifiers: Vec<String>,
    amount: f64,
}

fn new_statistic(
    kind: RequirementKind,
    name: &'static str,
    stat: Statistic,
    material: MaterialKind,
    params: &[&str],
    amount: Amount,
) -> Result<Box<dyn Requirement>> {
    let mut identifiers = Vec::with_capacity(params.len());
    for token in params {
        if !materials::is_valid(token, material) {
            return Err(RankError::UnknownIdentifier {
                name: name.to_string(),
                token: (*token).to_string(),
            });
        }
        identifiers.push(materials::canonical(token));
    }
    Ok(Box::new(StatisticRequirement {
        kind,
        name,
        stat,
        identifiers,
        amount: expect_number(name, amount)?,
    }))
}

fn new_block_break(params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    new_statistic(
        RequirementKind::BlockBreak,
        "block-break",
        Statistic::BlockBreak,
        MaterialKind::Block,
        params,
        amount,
    )
}

fn new_block_place(params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    new_statistic(
        RequirementKind::BlockPlace,
        "block-place",
        Statistic::BlockPlace,
        MaterialKind::Block,
        params,
        amount,
    )
}

fn new_item_use(params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    new_statistic(
        RequirementKind::ItemUse,
        "item-use",
        Statistic::ItemUse,
        MaterialKind::Item,
        params,
        amount,
    )
}

fn new_item_craft(params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    new_statistic(
        RequirementKind::ItemCraft,
        "item-craft",
        Statistic::ItemCraft,
        MaterialKind::Item,
        params,
        amount,
    )
}

impl Requirement for StatisticRequirement {
    fn kind(&self) -> RequirementKind {
        self.kind
    }

    fn is_met(&self, player: &PlayerView<'_>) -> bool {
        self.identifiers.iter().all(|identifier| {
            match player.stats.statistic(player.name, self.stat, Some(identifier)) {
                Ok(count) => count as f64 >= self.amount,
                Err(e) => {
                    tracing::warn!(
                        "Statistic lookup failed for {} ({} {identifier}): {e}",
                        player.name,
                        self.name
                    );
                    false
                }
            }
        })
    }

    fn describe(&self) -> String {
        format!(
            "{}: {} - {}",
            self.name,
            self.identifiers.join(", "),
            self.amount
        )
    }
}

// === Elapsed time ===

/// Met iff the player's elapsed-tick counter >= the required tick count.
///
/// The host counter is 32-bit. When the required tick count exceeds
/// `i32::MAX` the counter may have wrapped, so a negative reading is
/// treated as satisfied and a non-negative one is checked against
/// `required - i32::MAX`. Preserved as observed host behavior; see the
/// design notes before widening the counter.
pub(crate) fn elapsed_ticks_met(required: Tick, actual: i64) -> bool {
    let max = i32::MAX as u64;
    if required > max {
        if actual < 0 {
            return true;
        }
        actual as u64 >= required - max
    } else {
        actual >= 0 && actual as u64 >= required
    }
}

#[derive(Debug)]
pub struct ElapsedTimeRequirement {
    kind: RequirementKind,
    name: &'static str,
    stat: Statistic,
    required_ticks: Tick,
}

fn new_time_played(_params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    Ok(Box::new(ElapsedTimeRequirement {
        kind: RequirementKind::TimePlayed,
        name: "time-played",
        stat: Statistic::TimePlayed,
        required_ticks: expect_ticks("time-played", amount)?,
    }))
}

fn new_time_since_death(_params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>> {
    Ok(Box::new(ElapsedTimeRequirement {
        kind: RequirementKind::TimeSinceDeath,
        name: "time-since-death",
        stat: Statistic::TimeSinceDeath,
        required_ticks: expect_ticks("time-since-death", amount)?,
    }))
}

impl Requirement for ElapsedTimeRequirement {
    fn kind(&self) -> RequirementKind {
        self.kind
    }

    fn is_met(&self, player: &PlayerView<'_>) -> bool {
        match player.stats.statistic(player.name, self.stat, None) {
            Ok(actual) => elapsed_ticks_met(self.required_ticks, actual),
            Err(e) => {
                tracing::warn!("{} lookup failed for {}: {e}", self.name, player.name);
                false
            }
        }
    }

    fn describe(&self) -> String {
        format!("{}: {}", self.name, self.required_ticks)
    }
}
