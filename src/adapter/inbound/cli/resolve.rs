//! Input resolution for CLI commands.
//!
//! Every input follows the same precedence: explicit argument, then
//! environment variable, then an interactive prompt, then a built-in
//! default where one exists. JSON mode never prompts; inputs that
//! would need one are reported missing instead.

use std::env;
use std::str::FromStr;

use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};

use crate::config::NetworkProfile;
use crate::domain::{odds, SelectionRef};
use crate::error::{Error, InputError, Result};

use super::output;

/// Environment variables honored by the resolution layer.
pub const RPC_URL_ENV: &str = "POLYGON_RPC_URL";
pub const PRIVATE_KEY_ENV: &str = "BETTOR_PRIVATE_KEY";
pub const ADDRESS_ENV: &str = "BETTOR_ADDRESS";
pub const AMOUNT_ENV: &str = "BET_AMOUNT";
pub const CONDITION_ID_ENV: &str = "CONDITION_ID";
pub const OUTCOME_ID_ENV: &str = "OUTCOME_ID";
pub const MIN_ODDS_ENV: &str = "MIN_ODDS";
pub const BET_IDS_ENV: &str = "BET_IDS";

/// Odds quote offered when neither flag, environment, nor prompt
/// names one.
pub const DEFAULT_ODDS_QUOTE: &str = "1.5";

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// RPC endpoint: flag, then `POLYGON_RPC_URL`, then the profile.
/// Never prompts.
#[must_use]
pub fn rpc_url(arg: Option<&str>, profile: &NetworkProfile) -> String {
    if let Some(value) = arg {
        return value.trim().to_string();
    }
    env_value(RPC_URL_ENV).unwrap_or_else(|| profile.rpc_url.clone())
}

/// Wallet address: flag, then `BETTOR_ADDRESS`, then a prompt.
///
/// # Errors
///
/// Returns [`InputError::InvalidAddress`] for malformed input and
/// [`InputError::Missing`] in JSON mode when nothing was supplied.
pub fn address(arg: Option<&str>) -> Result<Address> {
    if let Some(value) = arg {
        return parse_address(value);
    }
    if let Some(value) = env_value(ADDRESS_ENV) {
        return parse_address(&value);
    }
    if output::is_json() {
        return Err(InputError::Missing {
            field: "address (--address or BETTOR_ADDRESS)",
        }
        .into());
    }
    let value: String = Input::with_theme(&theme())
        .with_prompt("Wallet address")
        .interact_text()?;
    parse_address(&value)
}

/// Bettor signer: `BETTOR_PRIVATE_KEY`, then a hidden prompt. The key
/// is never accepted as a flag and never echoed back in errors.
///
/// # Errors
///
/// Returns [`InputError::InvalidKey`] for malformed input and
/// [`InputError::Missing`] in JSON mode when the variable is unset.
pub fn signer(chain_id: u64) -> Result<PrivateKeySigner> {
    let raw = match env_value(PRIVATE_KEY_ENV) {
        Some(key) => key,
        None => {
            if output::is_json() {
                return Err(InputError::Missing {
                    field: "private key (BETTOR_PRIVATE_KEY)",
                }
                .into());
            }
            Password::with_theme(&theme())
                .with_prompt("Bettor private key")
                .interact()?
        }
    };
    let signer = parse_key(&raw)?;
    Ok(signer.with_chain_id(Some(chain_id)))
}

/// Stake: flag, then `BET_AMOUNT`, then a prompt.
///
/// # Errors
///
/// Returns [`InputError::InvalidAmount`] for zero or malformed input
/// and [`InputError::Missing`] in JSON mode when nothing was supplied.
pub fn amount(arg: Option<u64>) -> Result<u64> {
    if let Some(value) = arg {
        if value == 0 {
            return Err(InputError::InvalidAmount {
                value: "0".to_string(),
            }
            .into());
        }
        return Ok(value);
    }
    if let Some(value) = env_value(AMOUNT_ENV) {
        return parse_amount(&value);
    }
    if output::is_json() {
        return Err(InputError::Missing {
            field: "amount (--amount or BET_AMOUNT)",
        }
        .into());
    }
    let value: String = Input::with_theme(&theme())
        .with_prompt("Stake in smallest token units")
        .interact_text()?;
    parse_amount(&value)
}

/// Minimum odds, already normalized to the 1e12 fixed-point scale:
/// flag, then `MIN_ODDS`, then the quote of the selection picked
/// interactively, then a prompt with the default quote.
///
/// # Errors
///
/// Returns [`InputError::InvalidOdds`] for a malformed quote.
pub fn min_odds(arg: Option<&str>, quoted: Option<&str>) -> Result<u64> {
    let quote = match arg {
        Some(value) => value.to_string(),
        None => match env_value(MIN_ODDS_ENV) {
            Some(value) => value,
            None => match quoted {
                Some(value) => value.to_string(),
                None if output::is_json() => DEFAULT_ODDS_QUOTE.to_string(),
                None => Input::with_theme(&theme())
                    .with_prompt("Minimum acceptable odds")
                    .default(DEFAULT_ODDS_QUOTE.to_string())
                    .interact_text()?,
            },
        },
    };
    odds::min_odds_from_quote(&quote)
}

/// Selections named up front via flags or the `CONDITION_ID` /
/// `OUTCOME_ID` pair. `Ok(None)` means nothing was named and the
/// caller should fall back to the interactive picker.
///
/// # Errors
///
/// Returns [`InputError::SelectionMismatch`] when the id lists do not
/// pair up.
pub fn explicit_selections(
    condition_ids: &[String],
    outcome_ids: &[String],
) -> Result<Option<Vec<SelectionRef>>> {
    let mut condition_ids = condition_ids.to_vec();
    let mut outcome_ids = outcome_ids.to_vec();
    if condition_ids.is_empty() && outcome_ids.is_empty() {
        match (env_value(CONDITION_ID_ENV), env_value(OUTCOME_ID_ENV)) {
            (Some(condition), Some(outcome)) => {
                condition_ids.push(condition);
                outcome_ids.push(outcome);
            }
            _ => return Ok(None),
        }
    }
    if condition_ids.len() != outcome_ids.len() {
        return Err(InputError::SelectionMismatch {
            reason: format!(
                "{} condition ids but {} outcome ids",
                condition_ids.len(),
                outcome_ids.len()
            ),
        }
        .into());
    }
    let refs = condition_ids
        .into_iter()
        .zip(outcome_ids)
        .map(|(condition_id, outcome_id)| {
            let condition_id = condition_id.trim().to_string();
            let outcome_id = outcome_id.trim().to_string();
            if condition_id.is_empty() || outcome_id.is_empty() {
                return Err(Error::from(InputError::SelectionMismatch {
                    reason: "selection ids must not be empty".to_string(),
                }));
            }
            Ok(SelectionRef {
                condition_id,
                outcome_id,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(refs))
}

/// Bet ids to claim: flag, then `BET_IDS`, then a prompt.
///
/// # Errors
///
/// Returns [`InputError::InvalidBetId`] for malformed ids and
/// [`InputError::Missing`] when the list ends up empty.
pub fn bet_ids(arg: Option<&str>) -> Result<Vec<u64>> {
    let raw = match arg {
        Some(value) => value.to_string(),
        None => match env_value(BET_IDS_ENV) {
            Some(value) => value,
            None if output::is_json() => {
                return Err(InputError::Missing {
                    field: "bet ids (--bet-ids or BET_IDS)",
                }
                .into())
            }
            None => Input::with_theme(&theme())
                .with_prompt("Bet ids to claim (comma-separated)")
                .interact_text()?,
        },
    };
    parse_bet_ids(&raw)
}

/// Ask for confirmation unless `--yes` was passed. JSON mode never
/// prompts; it requires the flag.
///
/// # Errors
///
/// Returns [`InputError::Missing`] in JSON mode without `--yes`.
pub fn confirm(prompt: &str, skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }
    if output::is_json() {
        return Err(InputError::Missing {
            field: "confirmation (pass --yes)",
        }
        .into());
    }
    Ok(Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

pub(crate) fn parse_address(value: &str) -> Result<Address> {
    let trimmed = value.trim();
    Address::from_str(trimmed).map_err(|err| {
        InputError::InvalidAddress {
            value: trimmed.to_string(),
            reason: err.to_string(),
        }
        .into()
    })
}

fn parse_key(value: &str) -> Result<PrivateKeySigner> {
    let trimmed = value.trim().trim_start_matches("0x");
    PrivateKeySigner::from_str(trimmed).map_err(|err| {
        InputError::InvalidKey {
            reason: err.to_string(),
        }
        .into()
    })
}

pub(crate) fn parse_amount(value: &str) -> Result<u64> {
    let parsed = value.trim().parse::<u64>().ok().filter(|amount| *amount > 0);
    parsed.ok_or_else(|| {
        InputError::InvalidAmount {
            value: value.trim().to_string(),
        }
        .into()
    })
}

pub(crate) fn parse_bet_ids(raw: &str) -> Result<Vec<u64>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>().map_err(|_| {
                Error::from(InputError::InvalidBetId {
                    value: part.to_string(),
                })
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if ids.is_empty() {
        return Err(InputError::Missing { field: "bet ids" }.into());
    }
    Ok(ids)
}
