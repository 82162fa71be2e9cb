//! Parsing of human-readable size expressions such as `50M` or `1.5GiB`

use crate::error::{ConfigError, Result};

const BASE: f64 = 1024.0;

/// Parses a size expression into a byte count.
///
/// The accepted grammar is a decimal number followed by an optional unit:
/// `K`, `M`, `G` or `P` with an optional `i` and `B` (`512`, `50M`, `1.5GiB`,
/// `2 gb`). Units are case-insensitive and always base 1024.
pub fn parse_size(expr: &str) -> Result<u64> {
    let invalid = || ConfigError::InvalidSize(expr.to_string());

    let trimmed = expr.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    // digits with at most one fractional part, starting with a digit
    let mut parts = number.split('.');
    let well_formed = !parts.next().unwrap_or_default().is_empty()
        && match (parts.next(), parts.next()) {
            (None, _) => true,
            (Some(frac), None) => !frac.is_empty(),
            _ => false,
        };
    if !well_formed {
        return Err(invalid().into());
    }
    let value: f64 = number.parse().map_err(|_| invalid())?;

    let mut rest = unit.trim_start().chars().peekable();
    let factor = match rest.peek().map(|c| c.to_ascii_uppercase()) {
        Some('K') => BASE,
        Some('M') => BASE.powi(2),
        Some('G') => BASE.powi(3),
        Some('P') => BASE.powi(5),
        _ => 1.0,
    };
    if factor != 1.0 {
        rest.next();
    }
    if rest.peek().is_some_and(|c| c.eq_ignore_ascii_case(&'i')) {
        rest.next();
    }
    if rest.peek().is_some_and(|c| c.eq_ignore_ascii_case(&'b')) {
        rest.next();
    }
    if rest.any(|c| !c.is_whitespace()) {
        return Err(invalid().into());
    }

    Ok((value * factor) as u64)
}
