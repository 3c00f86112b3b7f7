//! Handler for the `allowance` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::WalletArgs;
use crate::adapter::inbound::cli::{output, resolve};
use crate::adapter::outbound::chain::{format_units, ChainClient};
use crate::config::NetworkProfile;
use crate::error::Result;

/// Show the relayer's bet token allowance for a wallet.
pub async fn execute(profile_path: Option<&Path>, args: &WalletArgs) -> Result<()> {
    if output::is_quiet() && !output::is_json() {
        return Ok(());
    }

    let profile = NetworkProfile::resolve(profile_path)?;
    let rpc_url = resolve::rpc_url(args.rpc_url.as_deref(), &profile);
    let owner = resolve::address(args.address.as_deref())?;
    let token = profile.bet_token_address()?;
    let spender = profile.relayer_address()?;
    let chain = ChainClient::new(&rpc_url)?;

    let pb = output::spinner("Fetching allowance");
    let allowance = match chain.allowance(token, owner, spender).await {
        Ok(allowance) => {
            output::spinner_success(&pb, "Fetching allowance");
            allowance
        }
        Err(err) => {
            output::spinner_fail(&pb, "Fetching allowance");
            return Err(err);
        }
    };

    let formatted = format_units(allowance, profile.token_decimals);

    if output::is_json() {
        output::json_output(json!({
            "command": "allowance",
            "owner": owner.to_string(),
            "spender": spender.to_string(),
            "token": profile.token_symbol,
            "units": allowance.to_string(),
            "formatted": formatted.to_string(),
        }));
        return Ok(());
    }

    output::section("Relayer Allowance");
    output::field("Owner", owner);
    output::field("Spender", spender);
    output::field("Token", &profile.token_symbol);
    output::field("Allowance", format!("{formatted} ({allowance} units)"));

    if allowance.is_zero() {
        output::note("The relayer is not yet approved; `punter place` grants a bounded allowance per order.");
    }

    Ok(())
}
