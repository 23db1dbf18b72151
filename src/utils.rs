//! Utility functions.

use anyhow::{bail, Context, Result};

/// Parses an address written either as `0x`-prefixed hex or as decimal.
pub fn parse_address(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!("empty address string");
    }
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.with_context(|| format!("invalid address '{}'", text))
}

/// Parses a signed offset, e.g. `-0x100` or `0x2000`.
pub fn parse_offset(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let (negative, magnitude) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let value = parse_address(magnitude).with_context(|| format!("invalid offset '{}'", text))?;
    let value = i64::try_from(value).with_context(|| format!("offset '{}' out of range", text))?;
    Ok(if negative { -value } else { value })
}

/// Inclusive end of a range, `None` for an empty range.
pub fn inclusive_end(start: u64, length: u64) -> Option<u64> {
    if length == 0 {
        return None;
    }
    start.checked_add(length - 1)
}
