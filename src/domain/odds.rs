//! Odds normalization for the order book's fixed-point scale.
//!
//! The data feed quotes odds as decimal strings such as `"1.85"`. The
//! order book expects a minimum-odds integer scaled by `1e12`, so a
//! quote of `1.5` becomes `1_500_000_000_000`. Values at or above
//! `1e10` are treated as already scaled and are only rounded, which
//! lets callers pass either representation.

use rust_decimal::Decimal;

use crate::error::{InputError, Result};

/// Fixed-point scale applied to decimal odds quotes.
pub const ODDS_SCALE: f64 = 1e12;

/// Quotes at or above this magnitude are treated as already scaled.
pub const SCALED_THRESHOLD: f64 = 1e10;

const ODDS_DECIMALS: u32 = 12;

/// Scales a raw odds value to the book's fixed-point representation.
#[must_use]
pub fn normalize_odds(raw: f64) -> u64 {
    if raw >= SCALED_THRESHOLD {
        raw.round() as u64
    } else {
        (raw * ODDS_SCALE).round() as u64
    }
}

/// Parses a decimal odds quote and normalizes it.
///
/// # Errors
///
/// Returns [`InputError::InvalidOdds`] when the quote is not a
/// positive, finite decimal.
pub fn min_odds_from_quote(quote: &str) -> Result<u64> {
    let trimmed = quote.trim();
    let parsed: f64 = trimmed.parse().map_err(|_| InputError::InvalidOdds {
        value: trimmed.to_string(),
    })?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(InputError::InvalidOdds {
            value: trimmed.to_string(),
        }
        .into());
    }
    Ok(normalize_odds(parsed))
}

/// Renders a scaled minimum-odds value back as a decimal string.
#[must_use]
pub fn format_odds(min_odds: u64) -> String {
    Decimal::from_i128_with_scale(i128::from(min_odds), ODDS_DECIMALS)
        .normalize()
        .to_string()
}
