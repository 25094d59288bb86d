//! In-memory backend implementations
//!
//! Used by the demo binary and the integration tests. State sits behind
//! mutexes so the doubles satisfy the same `&self` contracts as a real
//! backend adapter would.

use crate::backend::{
    BackendError, EconomyBackend, MessageKind, NotificationSink, PermissionBackend, Statistic,
    StatisticsBackend,
};
use crate::core::types::RankId;
use ahash::{AHashMap, AHashSet};
use serde_json::Value;
use std::sync::Mutex;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Map-backed permission backend with optional failure injection
#[derive(Debug, Default)]
pub struct MemoryPermissions {
    primary: Mutex<AHashMap<String, String>>,
    known_groups: Mutex<AHashSet<String>>,
    deny_add_to: Mutex<Option<String>>,
}

impl MemoryPermissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_group(&self, group: &str) {
        lock(&self.known_groups).insert(group.to_string());
    }

    pub fn set_primary_group(&self, player: &str, group: &str) {
        self.define_group(group);
        lock(&self.primary).insert(player.to_string(), group.to_string());
    }

    /// Make every `add_to_group` targeting `group` fail, to exercise the
    /// engine's rollback path.
    pub fn deny_add_to(&self, group: &str) {
        *lock(&self.deny_add_to) = Some(group.to_string());
    }
}

impl PermissionBackend for MemoryPermissions {
    fn primary_group(&self, player: &str) -> Result<String, BackendError> {
        Ok(lock(&self.primary).get(player).cloned().unwrap_or_default())
    }

    fn add_to_group(&self, player: &str, group: &RankId) -> bool {
        if lock(&self.deny_add_to).as_deref() == Some(group.as_str()) {
            return false;
        }
        if !lock(&self.known_groups).contains(group.as_str()) {
            return false;
        }
        lock(&self.primary).insert(player.to_string(), group.as_str().to_string());
        true
    }

    fn remove_from_group(&self, player: &str, group: &RankId) -> bool {
        let mut primary = lock(&self.primary);
        match primary.get(player) {
            Some(current) if current == group.as_str() => {
                primary.remove(player);
                true
            }
            _ => false,
        }
    }

    fn group_exists(&self, group: &RankId) -> bool {
        lock(&self.known_groups).contains(group.as_str())
    }
}

/// Map-backed economy backend
#[derive(Debug, Default)]
pub struct MemoryEconomy {
    balances: Mutex<AHashMap<String, f64>>,
}

impl MemoryEconomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, player: &str, amount: f64) {
        lock(&self.balances).insert(player.to_string(), amount);
    }
}

impl EconomyBackend for MemoryEconomy {
    fn balance(&self, player: &str) -> Result<f64, BackendError> {
        Ok(lock(&self.balances).get(player).copied().unwrap_or(0.0))
    }

    fn withdraw(&self, player: &str, amount: f64) -> Result<(), BackendError> {
        let mut balances = lock(&self.balances);
        let current = balances.get(player).copied().unwrap_or(0.0);
        if current < amount {
            return Err(BackendError::new(format!(
                "insufficient funds: {current} < {amount}"
            )));
        }
        balances.insert(player.to_string(), current - amount);
        Ok(())
    }
}

/// Map-backed statistics backend
#[derive(Debug, Default)]
pub struct MemoryStatistics {
    counters: Mutex<AHashMap<(String, Statistic, Option<String>), i64>>,
    levels: Mutex<AHashMap<String, u32>>,
}

impl MemoryStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_statistic(&self, player: &str, stat: Statistic, qualifier: Option<&str>, value: i64) {
        lock(&self.counters).insert(
            (player.to_string(), stat, qualifier.map(str::to_string)),
            value,
        );
    }

    pub fn set_level(&self, player: &str, level: u32) {
        lock(&self.levels).insert(player.to_string(), level);
    }
}

impl StatisticsBackend for MemoryStatistics {
    fn statistic(
        &self,
        player: &str,
        stat: Statistic,
        qualifier: Option<&str>,
    ) -> Result<i64, BackendError> {
        let key = (player.to_string(), stat, qualifier.map(str::to_string));
        Ok(lock(&self.counters).get(&key).copied().unwrap_or(0))
    }

    fn level(&self, player: &str) -> Result<u32, BackendError> {
        Ok(lock(&self.levels).get(player).copied().unwrap_or(0))
    }
}

/// Sink that records every emitted message for inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<(MessageKind, Value)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<MessageKind> {
        lock(&self.messages).iter().map(|(k, _)| *k).collect()
    }

    pub fn take(&self) -> Vec<(MessageKind, Value)> {
        std::mem::take(&mut lock(&self.messages))
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, kind: MessageKind, context: Value) {
        lock(&self.messages).push((kind, context));
    }
}
