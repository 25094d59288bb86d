//! Compact duration grammar for elapsed-time requirements
//!
//! A duration is a sequence of `<unit><value>` components in any order,
//! e.g. `M1w2d3h4m5s6` = 1 month, 2 weeks, 3 days, 4 hours, 5 minutes,
//! 6 seconds. A bare integer is a count of seconds. Repeated units
//! accumulate. One month is fixed at 30 days.

use crate::core::error::{RankError, Result};
use crate::core::types::{Tick, TICKS_PER_SECOND};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;
const SECONDS_PER_MONTH: u64 = 30 * SECONDS_PER_DAY;

/// Seconds per unit letter. `M` is month; minute is lowercase `m` only,
/// every other unit accepts either case.
fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        'M' => Some(SECONDS_PER_MONTH),
        'w' | 'W' => Some(SECONDS_PER_WEEK),
        'd' | 'D' => Some(SECONDS_PER_DAY),
        'h' | 'H' => Some(SECONDS_PER_HOUR),
        'm' => Some(SECONDS_PER_MINUTE),
        's' | 'S' => Some(1),
        _ => None,
    }
}

/// Parse a duration string into the required tick count (20 ticks/second).
///
/// Errors on empty input, unknown unit letters, units without a value,
/// and totals of zero.
pub fn parse_duration_ticks(input: &str) -> Result<Tick> {
    let s = input.trim();
    if s.is_empty() {
        return Err(RankError::InvalidDuration(
            input.to_string(),
            "empty duration".to_string(),
        ));
    }

    let total_seconds = if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse::<u64>().map_err(|e| {
            RankError::InvalidDuration(input.to_string(), e.to_string())
        })?
    } else {
        parse_components(s, input)?
    };

    if total_seconds == 0 {
        return Err(RankError::InvalidDuration(
            input.to_string(),
            "duration must be greater than zero".to_string(),
        ));
    }

    Ok(total_seconds.saturating_mul(TICKS_PER_SECOND))
}

fn parse_components(s: &str, original: &str) -> Result<u64> {
    let mut total: u64 = 0;
    let mut chars = s.chars().peekable();

    while let Some(unit) = chars.next() {
        let per_unit = unit_seconds(unit).ok_or_else(|| {
            RankError::InvalidDuration(
                original.to_string(),
                format!("unknown unit '{unit}'"),
            )
        })?;

        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        if digits.is_empty() {
            return Err(RankError::InvalidDuration(
                original.to_string(),
                format!("unit '{unit}' has no value"),
            ));
        }
        let value: u64 = digits.parse().map_err(|e: std::num::ParseIntError| {
            RankError::InvalidDuration(original.to_string(), e.to_string())
        })?;

        total = total.saturating_add(per_unit.saturating_mul(value));
    }

    Ok(total)
}
