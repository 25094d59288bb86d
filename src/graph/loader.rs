//! Load the rank graph (and engine settings) from a TOML file
//!
//! A malformed edge — missing keys, negative cost, or any requirement
//! string the factory rejects — is skipped with a warning rather than
//! failing the whole load, so one bad line never takes the ladder down.

use crate::core::config::ProgressionConfig;
use crate::core::error::{RankError, Result};
use crate::core::types::RankId;
use crate::graph::{RankEdge, RankGraph};
use crate::requirement::factory::create_requirement;
use crate::requirement::registry::RequirementRegistry;
use std::fs;
use std::path::Path;

/// Everything one rank configuration file yields
#[derive(Debug)]
pub struct RankConfig {
    pub graph: RankGraph,
    pub settings: ProgressionConfig,
}

/// Load and parse a rank configuration file
pub fn load_rank_config(path: &Path, registry: &RequirementRegistry) -> Result<RankConfig> {
    let content = fs::read_to_string(path)?;
    parse_rank_config(&content, registry)
}

/// Parse rank configuration from TOML text
pub fn parse_rank_config(content: &str, registry: &RequirementRegistry) -> Result<RankConfig> {
    let toml: toml::Value = content
        .parse()
        .map_err(|e| RankError::Config(format!("Invalid TOML: {e}")))?;

    let mut edges = Vec::new();
    if let Some(ranks) = toml.get("ranks").and_then(|v| v.as_array()) {
        for value in ranks {
            match parse_edge(value, registry) {
                Ok(edge) => edges.push(edge),
                Err(reason) => tracing::warn!("Skipping rank edge: {reason}"),
            }
        }
    }

    let graph = RankGraph::new(edges);
    tracing::info!("Loaded rank graph with {} edges", graph.len());

    Ok(RankConfig {
        graph,
        settings: parse_settings(&toml),
    })
}

fn parse_edge(value: &toml::Value, registry: &RequirementRegistry) -> std::result::Result<RankEdge, String> {
    let from = value
        .get("from")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing 'from'".to_string())?
        .to_string();

    let to = value
        .get("to")
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("{from}: missing 'to'"))?
        .to_string();

    let display_name = value
        .get("display")
        .and_then(|v| v.as_str())
        .unwrap_or(&to)
        .to_string();

    let cost = value
        .get("cost")
        .map(|v| {
            v.as_float()
                .or_else(|| v.as_integer().map(|i| i as f64))
                .ok_or_else(|| format!("{from} -> {to}: 'cost' is not a number"))
        })
        .transpose()?
        .unwrap_or(0.0);
    if !cost.is_finite() || cost < 0.0 {
        return Err(format!("{from} -> {to}: cost {cost} must be >= 0"));
    }

    let mut requirement_strings = Vec::new();
    if let Some(requirements) = value.get("requirements").and_then(|v| v.as_array()) {
        for requirement in requirements {
            let definition = requirement
                .as_str()
                .ok_or_else(|| format!("{from} -> {to}: requirement is not a string"))?;
            // Pre-validate so a malformed string surfaces at load time,
            // not in the middle of a player's rankup attempt
            create_requirement(registry, definition)
                .map_err(|e| format!("{from} -> {to}: {e}"))?;
            requirement_strings.push(definition.to_string());
        }
    }

    Ok(RankEdge {
        from: RankId::new(from),
        to: RankId::new(to),
        display_name,
        requirement_strings,
        cost,
    })
}

fn parse_settings(toml: &toml::Value) -> ProgressionConfig {
    let mut settings = ProgressionConfig::default();
    if let Some(table) = toml.get("settings").and_then(|v| v.as_table()) {
        if let Some(broadcast) = table.get("broadcast-rankup").and_then(|v| v.as_bool()) {
            settings.broadcast_rankup = broadcast;
        }
    }
    settings
}
