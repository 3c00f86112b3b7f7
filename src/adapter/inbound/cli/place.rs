//! Handler for the `place` command: the full order lifecycle from
//! payload request through settlement tracking.

use std::path::Path;
use std::time::Duration;

use alloy_primitives::U256;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use serde_json::json;

use crate::adapter::inbound::cli::command::PlaceArgs;
use crate::adapter::inbound::cli::{output, resolve};
use crate::adapter::outbound::book::PollSettings;
use crate::adapter::outbound::chain::{format_units, AllowanceOutcome};
use crate::adapter::outbound::feed::{flatten_selections, FeedClient, GamesQuery};
use crate::app::{PlaceWorkflow, Tracking};
use crate::config::NetworkProfile;
use crate::domain::{odds, BetRequest, SelectionRef};
use crate::error::{FeedError, InputError, Result};

/// Games fetched for the interactive picker.
const PICKER_GAMES: u32 = 15;
/// Selection rows offered by the picker.
const PICKER_ROWS: usize = 20;

/// Place a bet end to end.
pub async fn execute(profile_path: Option<&Path>, args: &PlaceArgs) -> Result<()> {
    let mut profile = NetworkProfile::resolve(profile_path)?;
    let rpc_url = resolve::rpc_url(args.rpc_url.as_deref(), &profile);
    profile.rpc_url = rpc_url;

    let amount = resolve::amount(args.amount)?;
    let (selections, quoted_odds) =
        match resolve::explicit_selections(&args.condition_id, &args.outcome_id)? {
            Some(refs) => (refs, None),
            None => {
                let (refs, quote) = pick_selection(&profile).await?;
                (refs, Some(quote))
            }
        };
    let min_odds = resolve::min_odds(args.min_odds.as_deref(), quoted_odds.as_deref())?;

    let signer = resolve::signer(profile.chain_id)?;
    let workflow = PlaceWorkflow::new(&profile, signer)?;

    if !output::is_json() {
        output::section("Order");
        output::field("Bettor", workflow.bettor());
        output::field(
            "Stake",
            format!(
                "{} {}",
                format_units(U256::from(amount), profile.token_decimals),
                profile.token_symbol
            ),
        );
        output::field("Min odds", odds::format_odds(min_odds));
        output::field("Network", &profile.network);
        if output::verbosity() > 0 {
            output::field("Chain id", profile.chain_id);
        }
        if let [only] = selections.as_slice() {
            output::field(
                "Selection",
                format!("condition {} outcome {}", only.condition_id, only.outcome_id),
            );
        } else {
            for (index, leg) in selections.iter().enumerate() {
                output::field(
                    &format!("Leg {}", index + 1),
                    format!("condition {} outcome {}", leg.condition_id, leg.outcome_id),
                );
            }
        }
    }

    if !resolve::confirm("Submit this order?", args.yes)? {
        output::warning("Order aborted");
        return Ok(());
    }

    let request = BetRequest {
        amount,
        min_odds,
        chain: profile.network.clone(),
        selections,
    };

    let pb = output::spinner("Requesting order payload");
    let payload = match workflow.request_payload(&request).await {
        Ok(payload) => {
            output::spinner_success(&pb, "Order payload verified");
            payload
        }
        Err(err) => {
            output::spinner_fail(&pb, "Requesting order payload");
            return Err(err);
        }
    };

    let pb = output::spinner("Reconciling allowance");
    let allowance = match workflow.reconcile_allowance(amount, &payload).await {
        Ok(outcome) => {
            output::spinner_success(&pb, "Allowance reconciled");
            outcome
        }
        Err(err) => {
            output::spinner_fail(&pb, "Reconciling allowance");
            return Err(err);
        }
    };
    match allowance {
        AllowanceOutcome::Sufficient { current } => {
            output::note(&format!(
                "existing allowance of {} {} covers this order",
                format_units(current, profile.token_decimals),
                profile.token_symbol
            ));
        }
        AllowanceOutcome::Granted { tx_hash, amount } => {
            output::field(
                "Approved",
                format!(
                    "{} {}",
                    format_units(amount, profile.token_decimals),
                    profile.token_symbol
                ),
            );
            output::field("Approval tx", tx_hash);
        }
    }

    let pb = output::spinner("Signing order");
    let signature = match workflow.sign(&payload).await {
        Ok(signature) => {
            output::spinner_success(&pb, "Order signed");
            signature
        }
        Err(err) => {
            output::spinner_fail(&pb, "Signing order");
            return Err(err);
        }
    };

    let pb = output::spinner("Submitting order");
    let submitted = match workflow.submit(&payload, &signature).await {
        Ok(status) => {
            output::spinner_success(&pb, "Order submitted");
            status
        }
        Err(err) => {
            output::spinner_fail(&pb, "Submitting order");
            return Err(err);
        }
    };

    let order_id = match PlaceWorkflow::interpret_submission(&submitted)? {
        Tracking::Track { order_id } => order_id,
        Tracking::Untracked => {
            if output::is_json() {
                output::json_output(json!({
                    "command": "place",
                    "accepted": true,
                    "orderId": null,
                    "txHash": null,
                }));
                return Ok(());
            }
            output::success("Order accepted");
            output::note("the venue returned no order id; check `punter bets` for settlement");
            return Ok(());
        }
    };

    let settings = PollSettings {
        interval: Duration::from_millis(args.poll_interval_ms),
        max_attempts: args.poll_attempts,
    };
    let pb = output::spinner(&format!("Tracking order {order_id}"));
    let settled = match workflow.track(&payload, &order_id, settings).await {
        Ok(status) => {
            output::spinner_success(&pb, "Order settled");
            status
        }
        Err(err) => {
            output::spinner_fail(&pb, &format!("Tracking order {order_id}"));
            return Err(err);
        }
    };

    if output::is_json() {
        output::json_output(json!({
            "command": "place",
            "accepted": true,
            "orderId": order_id,
            "txHash": settled.settled_tx_hash(),
            "state": settled.state,
        }));
        return Ok(());
    }

    output::success("Bet placed");
    output::field("Order", &order_id);
    if let Some(hash) = settled.settled_tx_hash() {
        output::field("Transaction", hash);
    }

    Ok(())
}

/// Interactive selection picker fed by the games listing. Returns the
/// picked leg together with its quoted odds, which become the default
/// minimum. Refused in JSON mode, where selections must arrive via
/// flags or environment.
async fn pick_selection(profile: &NetworkProfile) -> Result<(Vec<SelectionRef>, String)> {
    if output::is_json() {
        return Err(InputError::Missing {
            field: "selection (--condition-id and --outcome-id)",
        }
        .into());
    }

    let feed = FeedClient::new(profile);
    let query = GamesQuery {
        first: PICKER_GAMES,
        ..GamesQuery::default()
    };

    let pb = output::spinner("Fetching open selections");
    let games = match feed.games(&query).await {
        Ok(games) => {
            output::spinner_success(&pb, "Fetching open selections");
            games
        }
        Err(err) => {
            output::spinner_fail(&pb, "Fetching open selections");
            return Err(err);
        }
    };

    let mut selections = flatten_selections(&games);
    selections.truncate(PICKER_ROWS);
    if selections.is_empty() {
        return Err(FeedError::NoSelections.into());
    }

    let items: Vec<String> = selections
        .iter()
        .map(|s| {
            format!(
                "{}  |  {} - {} @ {}",
                s.game_title, s.market_label, s.selection_label, s.current_odds
            )
        })
        .collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Pick a selection")
        .items(&items)
        .default(0)
        .interact()?;

    let chosen = &selections[index];
    let leg = SelectionRef {
        condition_id: chosen.condition_id.clone(),
        outcome_id: chosen.outcome_id.clone(),
    };
    Ok((vec![leg], chosen.current_odds.clone()))
}
