//! Handler for the `balances` command.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::command::WalletArgs;
use crate::adapter::inbound::cli::{output, resolve};
use crate::adapter::outbound::chain::{format_units, ChainClient, NATIVE_DECIMALS};
use crate::config::NetworkProfile;
use crate::error::Result;

/// Show native and bet token balances for a wallet.
pub async fn execute(profile_path: Option<&Path>, args: &WalletArgs) -> Result<()> {
    if output::is_quiet() && !output::is_json() {
        return Ok(());
    }

    let profile = NetworkProfile::resolve(profile_path)?;
    let rpc_url = resolve::rpc_url(args.rpc_url.as_deref(), &profile);
    let owner = resolve::address(args.address.as_deref())?;
    let token = profile.bet_token_address()?;
    let chain = ChainClient::new(&rpc_url)?;

    let pb = output::spinner("Fetching balances");
    let balances = match chain.balances(token, owner).await {
        Ok(balances) => {
            output::spinner_success(&pb, "Fetching balances");
            balances
        }
        Err(err) => {
            output::spinner_fail(&pb, "Fetching balances");
            return Err(err);
        }
    };

    let native = format_units(balances.native, NATIVE_DECIMALS);
    let token_balance = format_units(balances.token, profile.token_decimals);

    if output::is_json() {
        output::json_output(json!({
            "command": "balances",
            "address": owner.to_string(),
            "native": {
                "symbol": profile.native_symbol,
                "units": balances.native.to_string(),
                "formatted": native.to_string(),
            },
            "token": {
                "symbol": profile.token_symbol,
                "units": balances.token.to_string(),
                "formatted": token_balance.to_string(),
            },
            "freshWallet": balances.is_fresh_wallet(),
        }));
        return Ok(());
    }

    output::section("Wallet Balances");
    output::field("Address", owner);
    output::field(
        &profile.native_symbol,
        format!("{native} ({} units)", balances.native),
    );
    output::field(
        &profile.token_symbol,
        format!("{token_balance} ({} units)", balances.token),
    );

    if balances.is_fresh_wallet() {
        output::warning("Wallet holds no funds");
        output::hint(&format!(
            "fund it with {} for stakes and {} for gas before placing bets",
            profile.token_symbol, profile.native_symbol
        ));
    }

    Ok(())
}
