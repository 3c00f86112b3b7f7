//! Handler for the `claim` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::ClaimArgs;
use crate::adapter::inbound::cli::{output, resolve};
use crate::app::ClaimWorkflow;
use crate::config::NetworkProfile;
use crate::error::Result;

/// Claim payouts for redeemable bets.
pub async fn execute(profile_path: Option<&Path>, args: &ClaimArgs) -> Result<()> {
    let mut profile = NetworkProfile::resolve(profile_path)?;
    let rpc_url = resolve::rpc_url(args.rpc_url.as_deref(), &profile);
    profile.rpc_url = rpc_url;

    let bet_ids = resolve::bet_ids(args.bet_ids.as_deref())?;
    let signer = resolve::signer(profile.chain_id)?;
    let workflow = ClaimWorkflow::new(&profile, signer)?;

    if !output::is_json() {
        output::section("Claim");
        output::field("Bettor", workflow.bettor());
        output::field("Network", &profile.network);
        output::field(
            "Bet ids",
            bet_ids
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        );
    }

    if !resolve::confirm("Submit this claim?", args.yes)? {
        output::warning("Claim aborted");
        return Ok(());
    }

    let pb = output::spinner("Requesting claim payload");
    let payload = match workflow.request_payload(&bet_ids).await {
        Ok(payload) => {
            output::spinner_success(&pb, "Claim payload verified");
            payload
        }
        Err(err) => {
            output::spinner_fail(&pb, "Requesting claim payload");
            return Err(err);
        }
    };

    let pb = output::spinner("Submitting claim transaction");
    let report = match workflow.settle(&payload).await {
        Ok(report) => {
            output::spinner_success(&pb, "Claim confirmed");
            report
        }
        Err(err) => {
            output::spinner_fail(&pb, "Submitting claim transaction");
            return Err(err);
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "claim",
            "betIds": bet_ids,
            "txHash": report.tx_hash,
            "blockNumber": report.block_number,
        }));
        return Ok(());
    }

    output::success("Payout claimed");
    output::field("Transaction", &report.tx_hash);
    if let Some(block) = report.block_number {
        output::field("Block", block);
    }

    Ok(())
}
