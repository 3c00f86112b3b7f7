//! Handler for the `bets` command.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::BetsArgs;
use crate::adapter::inbound::cli::{output, resolve};
use crate::adapter::outbound::feed::{BetsQuery, FeedClient};
use crate::config::NetworkProfile;
use crate::domain::Bet;
use crate::error::Result;

#[derive(Tabled)]
struct BetRow {
    #[tabled(rename = "Bet ID")]
    bet_id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Stake")]
    amount: String,
    #[tabled(rename = "Payout")]
    payout: String,
    #[tabled(rename = "Placed")]
    placed: String,
    #[tabled(rename = "Claim")]
    claim: &'static str,
}

impl BetRow {
    fn from_bet(bet: &Bet) -> Self {
        Self {
            bet_id: bet.bet_id.clone(),
            status: bet.status.clone().unwrap_or_else(|| "-".to_string()),
            result: bet.result.clone().unwrap_or_else(|| "-".to_string()),
            amount: bet.amount.clone().unwrap_or_else(|| "-".to_string()),
            payout: bet.payout.clone().unwrap_or_else(|| "-".to_string()),
            placed: bet
                .created_at()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            claim: claim_state(bet),
        }
    }
}

fn claim_state(bet: &Bet) -> &'static str {
    if bet.is_redeemed {
        "claimed"
    } else if bet.is_redeemable {
        "redeemable"
    } else {
        "-"
    }
}

/// List bets recorded for a wallet, newest first.
pub async fn execute(profile_path: Option<&Path>, args: &BetsArgs) -> Result<()> {
    if output::is_quiet() && !output::is_json() {
        return Ok(());
    }

    let profile = NetworkProfile::resolve(profile_path)?;
    let bettor = resolve::address(args.address.as_deref())?;
    let feed = FeedClient::new(&profile);
    let query = BetsQuery {
        bettor,
        redeemable_only: args.redeemable,
        first: args.first,
    };

    let pb = output::spinner("Fetching bet history");
    let bets = match feed.bets(&query).await {
        Ok(bets) => {
            output::spinner_success(&pb, "Fetching bet history");
            bets
        }
        Err(err) => {
            output::spinner_fail(&pb, "Fetching bet history");
            return Err(err);
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "bets",
            "bettor": bettor.to_string(),
            "count": bets.len(),
            "bets": bets,
        }));
        return Ok(());
    }

    if bets.is_empty() {
        if args.redeemable {
            output::warning("No redeemable bets for this wallet");
        } else {
            output::warning("No bets recorded for this wallet");
        }
        return Ok(());
    }

    output::section("Bet History");
    let rows: Vec<BetRow> = bets.iter().map(BetRow::from_bet).collect();
    let table = Table::new(rows).to_string();
    output::lines(&table);

    let redeemable: Vec<&str> = bets
        .iter()
        .filter(|bet| bet.is_redeemable && !bet.is_redeemed)
        .map(|bet| bet.bet_id.as_str())
        .collect();
    if !redeemable.is_empty() {
        output::hint(&format!(
            "claim payouts with {}",
            output::highlight(format!("punter claim --bet-ids {}", redeemable.join(",")))
        ));
    }

    Ok(())
}
