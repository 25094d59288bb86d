//! Requirement factory: definition string -> concrete instance
//!
//! A definition string is `<type> <param>... <amount>`, delimited by
//! whitespace and/or commas. The final token is ALWAYS the amount; every
//! preceding token is a variant-specific identifier. Arity and amount
//! validation happen here, identifier validation inside the variant's
//! constructor.

use crate::core::error::{RankError, Result};
use crate::requirement::duration::parse_duration_ticks;
use crate::requirement::registry::RequirementRegistry;
use crate::requirement::{Amount, AmountFormat, Requirement};

/// Parse one definition string into a requirement instance.
///
/// Instances are created per rank-edge evaluation and discarded after use;
/// they hold no reference to any specific player.
pub fn create_requirement(
    registry: &RequirementRegistry,
    definition: &str,
) -> Result<Box<dyn Requirement>> {
    let tokens: Vec<&str> = definition
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    let Some((&name, params)) = tokens.split_first() else {
        return Err(RankError::EmptyDefinition);
    };

    let def = registry
        .lookup(name)
        .ok_or_else(|| RankError::UnknownRequirement(name.to_string()))?;

    if params.len() < def.min_params || params.len() > def.max_params {
        return Err(RankError::BadArity {
            name: def.name.to_string(),
            min: def.min_params,
            max: def.max_params,
            got: params.len(),
            usage: def.usage.to_string(),
        });
    }

    let Some((&amount_token, identifiers)) = params.split_last() else {
        // min_params >= 1 for every registered definition, so the amount
        // token is always present once arity passed
        return Err(RankError::BadArity {
            name: def.name.to_string(),
            min: def.min_params,
            max: def.max_params,
            got: 0,
            usage: def.usage.to_string(),
        });
    };

    let amount = parse_amount(def.name, def.amount_format, amount_token)?;
    (def.ctor)(identifiers, amount)
}

fn parse_amount(name: &str, format: AmountFormat, token: &str) -> Result<Amount> {
    match format {
        AmountFormat::Number => {
            let value: f64 = token.parse().map_err(|_| RankError::InvalidAmount {
                name: name.to_string(),
                token: token.to_string(),
                reason: "not a number".to_string(),
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(RankError::InvalidAmount {
                    name: name.to_string(),
                    token: token.to_string(),
                    reason: "must be a finite number greater than zero".to_string(),
                });
            }
            Ok(Amount::Number(value))
        }
        AmountFormat::Duration => Ok(Amount::Ticks(parse_duration_ticks(token)?)),
    }
}
