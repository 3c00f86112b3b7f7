//! Staged order workflows behind the place and claim commands.
//!
//! Each stage is its own method so command handlers can report
//! progress between steps. Nothing in this module prints.

use alloy_primitives::{Address, U256};
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;

use crate::adapter::outbound::book::{
    poll_order, sign_order, BookClient, OrderPayload, PollSettings,
};
use crate::adapter::outbound::chain::{
    required_allowance, AllowanceOutcome, ChainClient, RawTx, TxReport,
};
use crate::config::NetworkProfile;
use crate::domain::{BetRequest, OrderStatus};
use crate::error::{BookError, Result};

/// What submission left us with once the venue answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracking {
    /// The venue assigned an order id; poll it for settlement.
    Track { order_id: String },
    /// Accepted without an id; there is nothing to poll.
    Untracked,
}

/// The staged workflow behind `punter place`.
pub struct PlaceWorkflow {
    profile: NetworkProfile,
    book: BookClient,
    chain: ChainClient,
    signer: PrivateKeySigner,
}

impl PlaceWorkflow {
    /// # Errors
    ///
    /// Returns a [`crate::error::ConfigError`] when the profile's RPC
    /// URL does not parse.
    pub fn new(profile: &NetworkProfile, signer: PrivateKeySigner) -> Result<Self> {
        Ok(Self {
            book: BookClient::new(profile),
            chain: ChainClient::new(&profile.rpc_url)?,
            profile: profile.clone(),
            signer,
        })
    }

    /// The wallet placing the order.
    #[must_use]
    pub fn bettor(&self) -> Address {
        self.signer.address()
    }

    /// Requests the order payload and validates it: field presence
    /// first, then the relayer destination gate. Nothing is approved
    /// or signed for a payload that fails here.
    ///
    /// # Errors
    ///
    /// Returns a [`BookError`] when the venue refuses the request and
    /// a [`crate::error::PayloadError`] when the payload is incomplete
    /// or targets the wrong contract.
    pub async fn request_payload(&self, request: &BetRequest) -> Result<OrderPayload> {
        let payload = self.book.bet_payload(request).await?;
        payload.require_bet_fields()?;
        payload.require_destination(&self.profile.relayer)?;
        Ok(payload)
    }

    /// Brings the bet token allowance up to stake plus relayer fee
    /// plus the fixed buffer. Never grants more than that.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ChainError`] when the reads or the
    /// approval transaction fail.
    pub async fn reconcile_allowance(
        &self,
        stake: u64,
        payload: &OrderPayload,
    ) -> Result<AllowanceOutcome> {
        let fee = payload.relayer_fee()?;
        let required = required_allowance(U256::from(stake), fee);
        debug!(%required, %fee, "reconciling bet token allowance");
        self.chain
            .ensure_allowance(
                &self.signer,
                self.profile.bet_token_address()?,
                self.profile.relayer_address()?,
                required,
            )
            .await
    }

    /// Signs the payload's EIP-712 message.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::SigningError`] when the payload's
    /// schemas or the signer fail.
    pub async fn sign(&self, payload: &OrderPayload) -> Result<String> {
        sign_order(&self.signer, payload).await
    }

    /// Submits the signed order to the venue.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Submission`] when the venue refuses it.
    pub async fn submit(&self, payload: &OrderPayload, signature: &str) -> Result<OrderStatus> {
        self.book
            .submit_order(payload, signature, self.bettor())
            .await
    }

    /// Decides what submission left us with. An immediately terminal
    /// answer is an error; an order id means poll; anything else was
    /// accepted untracked.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Terminal`] when the venue rejected or
    /// canceled the order on the spot.
    pub fn interpret_submission(status: &OrderStatus) -> Result<Tracking> {
        if let Some(state) = status.terminal_failure() {
            return Err(BookError::Terminal {
                state,
                reason: status.failure_reason().map(str::to_string),
            }
            .into());
        }
        match status.id.clone() {
            Some(order_id) => Ok(Tracking::Track { order_id }),
            None => Ok(Tracking::Untracked),
        }
    }

    /// Polls the order until settlement, terminal failure, or the
    /// attempt budget runs out.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Terminal`] or [`BookError::PollTimeout`]
    /// accordingly.
    pub async fn track(
        &self,
        payload: &OrderPayload,
        order_id: &str,
        settings: PollSettings,
    ) -> Result<OrderStatus> {
        let source = self.book.status_source(payload.status_api_base()?);
        poll_order(&source, order_id, settings).await
    }
}

/// The staged workflow behind `punter claim`.
pub struct ClaimWorkflow {
    profile: NetworkProfile,
    book: BookClient,
    chain: ChainClient,
    signer: PrivateKeySigner,
}

impl ClaimWorkflow {
    /// # Errors
    ///
    /// Returns a [`crate::error::ConfigError`] when the profile's RPC
    /// URL does not parse.
    pub fn new(profile: &NetworkProfile, signer: PrivateKeySigner) -> Result<Self> {
        Ok(Self {
            book: BookClient::new(profile),
            chain: ChainClient::new(&profile.rpc_url)?,
            profile: profile.clone(),
            signer,
        })
    }

    /// The wallet claiming the winnings.
    #[must_use]
    pub fn bettor(&self) -> Address {
        self.signer.address()
    }

    /// Requests the claim payload and checks it carries a complete
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns a [`BookError`] when the venue refuses the request and
    /// a [`crate::error::PayloadError`] when the payload is missing
    /// transaction fields.
    pub async fn request_payload(&self, bet_ids: &[u64]) -> Result<OrderPayload> {
        let payload = self
            .book
            .claim_payload(bet_ids, &self.profile.network)
            .await?;
        payload.require_claim_fields()?;
        Ok(payload)
    }

    /// Sends the payload's transaction and waits for its receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ChainError`] when the transaction
    /// fails or reverts.
    pub async fn settle(&self, payload: &OrderPayload) -> Result<TxReport> {
        let tx = RawTx {
            to: payload.destination()?,
            data: payload.call_data()?,
            value: payload.tx_value()?,
            chain_id: payload.tx_chain_id()?,
        };
        self.chain.send_raw(&self.signer, tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderState;
    use crate::error::Error;

    fn status(json: &str) -> OrderStatus {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn an_order_id_means_tracking() {
        let tracking =
            PlaceWorkflow::interpret_submission(&status(r#"{"id": "ord-9", "state": "Created"}"#))
                .unwrap();
        assert_eq!(
            tracking,
            Tracking::Track {
                order_id: "ord-9".into()
            }
        );
    }

    #[test]
    fn numeric_order_ids_are_accepted() {
        let tracking =
            PlaceWorkflow::interpret_submission(&status(r#"{"id": 1234}"#)).unwrap();
        assert_eq!(
            tracking,
            Tracking::Track {
                order_id: "1234".into()
            }
        );
    }

    #[test]
    fn acceptance_without_an_id_is_untracked() {
        let tracking = PlaceWorkflow::interpret_submission(&OrderStatus::default()).unwrap();
        assert_eq!(tracking, Tracking::Untracked);
    }

    #[test]
    fn an_immediate_rejection_is_an_error() {
        let err = PlaceWorkflow::interpret_submission(&status(
            r#"{"id": "ord-9", "state": "Rejected", "error": "stake too low"}"#,
        ))
        .unwrap_err();
        match err {
            Error::Book(BookError::Terminal { state, reason }) => {
                assert_eq!(state, OrderState::Rejected);
                assert_eq!(reason.as_deref(), Some("stake too low"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn workflows_refuse_a_profile_with_a_broken_rpc_url() {
        let mut profile = NetworkProfile::default();
        profile.rpc_url = "not a url".into();
        let signer = PrivateKeySigner::random();
        assert!(PlaceWorkflow::new(&profile, signer.clone()).is_err());
        assert!(ClaimWorkflow::new(&profile, signer).is_err());
    }
}
