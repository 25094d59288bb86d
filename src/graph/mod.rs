//! The configured rank graph: ranks and directed progression edges

pub mod loader;

use crate::core::types::RankId;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One configured transition from a rank to a candidate next rank
///
/// Immutable within an evaluation; a reload replaces the whole graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankEdge {
    pub from: RankId,
    pub to: RankId,
    /// Name shown when listing candidates; falls back to the target rank id
    pub display_name: String,
    /// Requirement definition strings, evaluated in order
    pub requirement_strings: Vec<String>,
    /// Currency cost of the transition, >= 0; 0 means free
    pub cost: f64,
}

/// All configured edges plus a from-rank index
///
/// Edge order follows configuration order. Duplicate `(from, to)` pairs
/// collapse to the last one configured, with a logged warning.
#[derive(Debug, Default)]
pub struct RankGraph {
    edges: Vec<RankEdge>,
    by_from: AHashMap<String, Vec<usize>>,
}

impl RankGraph {
    pub fn new(edges: Vec<RankEdge>) -> Self {
        let mut deduped: Vec<RankEdge> = Vec::with_capacity(edges.len());
        let mut seen: AHashMap<(String, String), usize> = AHashMap::new();

        for edge in edges {
            let key = (edge.from.0.clone(), edge.to.0.clone());
            if let Some(&idx) = seen.get(&key) {
                tracing::warn!(
                    "Duplicate rank edge {} -> {}; keeping the last one configured",
                    edge.from,
                    edge.to
                );
                deduped[idx] = edge;
            } else {
                seen.insert(key, deduped.len());
                deduped.push(edge);
            }
        }

        let mut by_from: AHashMap<String, Vec<usize>> = AHashMap::new();
        for (idx, edge) in deduped.iter().enumerate() {
            by_from.entry(edge.from.0.clone()).or_default().push(idx);
        }

        Self {
            edges: deduped,
            by_from,
        }
    }

    /// Outgoing edges for a rank, in configuration order
    pub fn edges_from(&self, rank: &str) -> Vec<&RankEdge> {
        self.by_from
            .get(rank)
            .map(|indexes| indexes.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// The edge for an exact `(from, to)` pair, if configured
    pub fn edge(&self, from: &str, to: &RankId) -> Option<&RankEdge> {
        self.edges_from(from).into_iter().find(|e| &e.to == to)
    }

    pub fn edges(&self) -> &[RankEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
