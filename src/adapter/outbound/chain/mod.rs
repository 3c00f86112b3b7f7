//! On-chain access: balances, allowance reconciliation, and raw
//! settlement transactions.
//!
//! Reads go through an unsigned provider; writes build a wallet
//! provider from the caller's signer. Approvals grant exactly the
//! bounded amount an order needs, never an unlimited allowance.

use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::network::{EthereumWallet, TransactionBuilder};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::sol;
use rust_decimal::Decimal;
use tracing::{debug, info};
use url::Url;

use crate::error::{ChainError, ConfigError, Error, Result};

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Decimals of the chain's native currency.
pub const NATIVE_DECIMALS: u32 = 18;

/// Margin added on top of stake plus relayer fee when approving, in
/// smallest token units (0.10 for a 6-decimal token). Covers fee
/// drift between payload issuance and execution.
pub const ALLOWANCE_BUFFER: u64 = 100_000;

/// The allowance an order needs before it can be submitted.
#[must_use]
pub fn required_allowance(stake: U256, relayer_fee: U256) -> U256 {
    stake + relayer_fee + U256::from(ALLOWANCE_BUFFER)
}

/// Scales raw token units to a decimal for display.
#[must_use]
pub fn format_units(units: U256, decimals: u32) -> Decimal {
    let value: u128 = units.try_into().unwrap_or(u128::MAX);
    let value = value.min(i128::MAX as u128) as i128;
    Decimal::from_i128_with_scale(value, decimals).normalize()
}

/// Native and bet token balances for one owner.
#[derive(Debug, Clone, Copy)]
pub struct Balances {
    pub native: U256,
    pub token: U256,
}

impl Balances {
    /// True when the wallet holds neither gas nor bet tokens.
    #[must_use]
    pub fn is_fresh_wallet(&self) -> bool {
        self.native.is_zero() && self.token.is_zero()
    }
}

/// How an allowance reconciliation concluded.
#[derive(Debug, Clone)]
pub enum AllowanceOutcome {
    /// The existing allowance already covers the requirement.
    Sufficient { current: U256 },
    /// An approval for the bounded amount was confirmed on chain.
    Granted { tx_hash: String, amount: U256 },
}

/// A pre-encoded transaction taken from a venue payload.
#[derive(Debug, Clone)]
pub struct RawTx {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub chain_id: u64,
}

/// A confirmed transaction, as reported by its receipt.
#[derive(Debug, Clone)]
pub struct TxReport {
    pub tx_hash: String,
    pub block_number: Option<u64>,
}

/// JSON-RPC chain client.
#[derive(Debug, Clone)]
pub struct ChainClient {
    rpc_url: Url,
}

impl ChainClient {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the RPC URL does not
    /// parse.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let rpc_url = rpc_url.parse().map_err(|err: url::ParseError| {
            Error::from(ConfigError::InvalidValue {
                field: "rpc_url",
                reason: err.to_string(),
            })
        })?;
        Ok(Self { rpc_url })
    }

    /// Reads the native and bet token balances concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Rpc`] when either read fails.
    pub async fn balances(&self, token: Address, owner: Address) -> Result<Balances> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let erc20 = IERC20::new(token, &provider);
        let (native, token_balance) = tokio::try_join!(
            async {
                provider.get_balance(owner).await.map_err(|err| {
                    Error::from(ChainError::Rpc(format!("native balance read failed: {err}")))
                })
            },
            async {
                erc20.balanceOf(owner).call().await.map_err(|err| {
                    Error::from(ChainError::Rpc(format!("token balance read failed: {err}")))
                })
            },
        )?;
        Ok(Balances {
            native,
            token: token_balance,
        })
    }

    /// Reads the spender allowance for an owner.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Rpc`] when the read fails.
    pub async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let erc20 = IERC20::new(token, &provider);
        let current = erc20
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|err| ChainError::Rpc(format!("allowance read failed: {err}")))?;
        debug!(%owner, %spender, allowance = %current, "allowance read");
        Ok(current)
    }

    /// Ensures the spender may move at least `required` token units,
    /// approving exactly that amount when the current allowance falls
    /// short.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::AllowanceTx`] when the approval cannot be
    /// sent, is not confirmed, or reverts.
    pub async fn ensure_allowance(
        &self,
        signer: &PrivateKeySigner,
        token: Address,
        spender: Address,
        required: U256,
    ) -> Result<AllowanceOutcome> {
        let current = self.allowance(token, signer.address(), spender).await?;
        if current >= required {
            debug!(current = %current, required = %required, "allowance already sufficient");
            return Ok(AllowanceOutcome::Sufficient { current });
        }

        info!(current = %current, required = %required, "allowance short, approving bounded amount");
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());
        let erc20 = IERC20::new(token, &provider);
        let pending = erc20
            .approve(spender, required)
            .send()
            .await
            .map_err(|err| ChainError::AllowanceTx(format!("failed to send approval: {err}")))?;
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|err| ChainError::AllowanceTx(format!("failed to confirm approval: {err}")))?;
        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if !receipt.status() {
            return Err(
                ChainError::AllowanceTx(format!("approval transaction {tx_hash} reverted")).into(),
            );
        }
        info!(tx_hash = %tx_hash, amount = %required, "approval confirmed");
        Ok(AllowanceOutcome::Granted {
            tx_hash,
            amount: required,
        })
    }

    /// Signs and sends a pre-encoded transaction, then waits for its
    /// receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::ClaimTx`] when the transaction cannot be
    /// sent, is not confirmed, or reverts.
    pub async fn send_raw(&self, signer: &PrivateKeySigner, tx: RawTx) -> Result<TxReport> {
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());
        let request = TransactionRequest::default()
            .with_to(tx.to)
            .with_input(tx.data)
            .with_value(tx.value)
            .with_chain_id(tx.chain_id);
        let pending = provider
            .send_transaction(request)
            .await
            .map_err(|err| ChainError::ClaimTx(format!("failed to send transaction: {err}")))?;
        debug!(tx_hash = %pending.tx_hash(), "transaction sent, awaiting receipt");
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|err| ChainError::ClaimTx(format!("failed to confirm transaction: {err}")))?;
        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if !receipt.status() {
            return Err(ChainError::ClaimTx(format!("transaction {tx_hash} reverted")).into());
        }
        Ok(TxReport {
            tx_hash,
            block_number: receipt.block_number,
        })
    }
}


#[cfg(all(test, feature = "book-integration"))]
mod integration_tests {
    use super::*;
    use crate::config::NetworkProfile;
    use std::str::FromStr;

    #[tokio::test]
    async fn reads_live_balances_and_allowance() {
        let Ok(owner) = std::env::var("BETTOR_ADDRESS") else {
            eprintln!("skipping: BETTOR_ADDRESS not set");
            return;
        };
        let profile = NetworkProfile::polygon();
        let rpc_url = std::env::var("POLYGON_RPC_URL").unwrap_or_else(|_| profile.rpc_url.clone());
        let client = ChainClient::new(&rpc_url).unwrap();
        let owner = Address::from_str(&owner).unwrap();
        let token = profile.bet_token_address().unwrap();

        let balances = client.balances(token, owner).await.unwrap();
        println!(
            "native: {}, token: {}",
            format_units(balances.native, NATIVE_DECIMALS),
            format_units(balances.token, profile.token_decimals)
        );

        let allowance = client
            .allowance(token, owner, profile.relayer_address().unwrap())
            .await
            .unwrap();
        println!("allowance: {allowance}");
    }
}
