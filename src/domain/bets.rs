//! Bet history rows from the venue subgraph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// One historical bet for a bettor, as reported by the bets subgraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    #[serde(deserialize_with = "wire::loose_string")]
    pub bet_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub is_redeemable: bool,
    #[serde(default)]
    pub is_redeemed: bool,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub payout: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub created_block_timestamp: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub resolved_block_timestamp: Option<String>,
}

impl Bet {
    /// Placement time decoded from the subgraph's unix-seconds string.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let seconds: i64 = self.created_block_timestamp.as_deref()?.trim().parse().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}
