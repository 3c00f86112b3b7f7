//! Decoding and validation of the venue's base64 order payloads.
//!
//! The venue answers bet and claim requests with `{"encoded": ...}`:
//! a base64 JSON document holding the transaction fields, the EIP-712
//! schemas, the signable message, and the submission URL. Nothing in
//! it is trusted until checked here. In particular the destination
//! gate refuses to sign a payload that targets any contract other
//! than the profile's relayer.

use std::str::FromStr;

use alloy_primitives::{Address, Bytes, U256};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{PayloadError, Result};

/// Primary EIP-712 type for single bets.
pub const SINGLE_BET_TYPE: &str = "ClientBetData";
/// Primary EIP-712 type for combo bets.
pub const COMBO_BET_TYPE: &str = "ClientComboBetData";

const ORDER_PATH_SUFFIXES: [&str; 2] = ["/bet/orders/ordinar", "/bet/orders/combo"];

/// Response wrapper used by the venue's bet and claim endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub encoded: Option<String>,
}

/// A decoded order payload. Every field is optional on the wire;
/// [`OrderPayload::require_bet_fields`] and
/// [`OrderPayload::require_claim_fields`] enforce what each flow
/// needs before anything is signed or sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub chain_id: Option<Value>,
    #[serde(default)]
    pub domain: Option<Value>,
    #[serde(default)]
    pub types: Option<Value>,
    #[serde(default)]
    pub signable_client_bet_data: Option<Value>,
    #[serde(default)]
    pub api_client_bet_data: Option<Value>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

/// Decodes the base64 JSON payload out of a venue envelope.
///
/// # Errors
///
/// Returns [`PayloadError::MissingEncoded`] when the envelope carries
/// no payload, and [`PayloadError::Base64`] or [`PayloadError::Json`]
/// when it does not decode.
pub fn decode_payload(envelope: &Envelope) -> Result<OrderPayload> {
    let encoded = envelope
        .encoded
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .ok_or(PayloadError::MissingEncoded)?;
    let bytes = decode_base64(encoded)?;
    let payload = serde_json::from_slice(&bytes).map_err(PayloadError::Json)?;
    Ok(payload)
}

pub(crate) fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded.trim())
        .map_err(|err| PayloadError::Base64(err).into())
}

/// Strips the known order-path suffix (with or without a trailing
/// slash) from a submission URL to find the status API base. The
/// input is returned unchanged when no suffix matches or stripping
/// would leave nothing.
#[must_use]
pub fn api_base(api_url: &str) -> &str {
    let trimmed = api_url.strip_suffix('/').unwrap_or(api_url);
    for suffix in ORDER_PATH_SUFFIXES {
        if let Some(base) = trimmed.strip_suffix(suffix) {
            if base.is_empty() {
                return api_url;
            }
            return base;
        }
    }
    api_url
}

impl OrderPayload {
    fn require(present: bool, field: &'static str) -> Result<()> {
        if present {
            Ok(())
        } else {
            Err(PayloadError::MissingField { field }.into())
        }
    }

    /// Presence checks a bet payload must pass before signing.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingField`] naming the first absent
    /// field.
    pub fn require_bet_fields(&self) -> Result<()> {
        Self::require(self.to.is_some(), "to")?;
        Self::require(self.data.is_some(), "data")?;
        Self::require(self.chain_id.is_some(), "chainId")?;
        Self::require(self.domain.is_some(), "domain")?;
        Self::require(self.types.is_some(), "types")?;
        Self::require(
            self.signable_client_bet_data.is_some(),
            "signableClientBetData",
        )?;
        Self::require(self.api_url.is_some(), "apiUrl")?;
        Ok(())
    }

    /// Presence checks a claim payload must pass before settlement.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingField`] naming the first absent
    /// field.
    pub fn require_claim_fields(&self) -> Result<()> {
        Self::require(self.to.is_some(), "to")?;
        Self::require(self.data.is_some(), "data")?;
        Self::require(self.chain_id.is_some(), "chainId")?;
        Ok(())
    }

    /// Refuses payloads that would authorize any contract other than
    /// the expected relayer. Comparison is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::DestinationMismatch`] when the payload
    /// targets another contract.
    pub fn require_destination(&self, relayer: &str) -> Result<()> {
        let actual = self
            .to
            .as_deref()
            .ok_or(PayloadError::MissingField { field: "to" })?;
        if actual.eq_ignore_ascii_case(relayer) {
            Ok(())
        } else {
            Err(PayloadError::DestinationMismatch {
                expected: relayer.to_string(),
                actual: actual.to_string(),
            }
            .into())
        }
    }

    /// Destination contract as a checked address.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when the field is absent or does not
    /// parse.
    pub fn destination(&self) -> Result<Address> {
        let raw = self
            .to
            .as_deref()
            .ok_or(PayloadError::MissingField { field: "to" })?;
        Address::from_str(raw).map_err(|err| {
            PayloadError::InvalidField {
                field: "to",
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Transaction calldata as bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when the field is absent or does not
    /// parse as hex.
    pub fn call_data(&self) -> Result<Bytes> {
        let raw = self
            .data
            .as_deref()
            .ok_or(PayloadError::MissingField { field: "data" })?;
        Bytes::from_str(raw).map_err(|err| {
            PayloadError::InvalidField {
                field: "data",
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Native value to attach to the transaction; absent means zero.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when the field is present but does
    /// not parse.
    pub fn tx_value(&self) -> Result<U256> {
        match &self.value {
            None | Some(Value::Null) => Ok(U256::ZERO),
            Some(value) => parse_u256(value).ok_or_else(|| {
                PayloadError::InvalidField {
                    field: "value",
                    reason: format!("cannot parse {value}"),
                }
                .into()
            }),
        }
    }

    /// Chain id the payload's transaction must run on.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when the field is absent or does not
    /// parse.
    pub fn tx_chain_id(&self) -> Result<u64> {
        let value = self
            .chain_id
            .as_ref()
            .ok_or(PayloadError::MissingField { field: "chainId" })?;
        parse_u64(value).ok_or_else(|| {
            PayloadError::InvalidField {
                field: "chainId",
                reason: format!("cannot parse {value}"),
            }
            .into()
        })
    }

    /// Submission URL for the signed order.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingField`] when absent.
    pub fn submit_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .ok_or_else(|| PayloadError::MissingField { field: "apiUrl" }.into())
    }

    /// Base of the order status API, derived from the submission URL.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::MissingField`] when the submission URL
    /// is absent.
    pub fn status_api_base(&self) -> Result<&str> {
        Ok(api_base(self.submit_url()?))
    }

    /// The relayer fee in smallest token units. The venue puts it
    /// under `clientData.relayerFeeAmount`, preferring the API copy of
    /// the bet data; it arrives as a JSON number or a decimal string,
    /// and absent means zero.
    ///
    /// # Errors
    ///
    /// Returns a [`PayloadError`] when a fee is present but does not
    /// parse.
    pub fn relayer_fee(&self) -> Result<U256> {
        let client_data = self
            .api_client_bet_data
            .as_ref()
            .and_then(|data| data.get("clientData"))
            .or_else(|| {
                self.signable_client_bet_data
                    .as_ref()
                    .and_then(|data| data.get("clientData"))
            });
        match client_data.and_then(|data| data.get("relayerFeeAmount")) {
            None | Some(Value::Null) => Ok(U256::ZERO),
            Some(fee) => parse_u256(fee).ok_or_else(|| {
                PayloadError::InvalidField {
                    field: "relayerFeeAmount",
                    reason: format!("cannot parse {fee}"),
                }
                .into()
            }),
        }
    }

    /// Primary EIP-712 type: combo when the schema set defines one,
    /// single otherwise.
    #[must_use]
    pub fn primary_type(&self) -> &'static str {
        let has_combo = self
            .types
            .as_ref()
            .and_then(|types| types.get(COMBO_BET_TYPE))
            .is_some();
        if has_combo {
            COMBO_BET_TYPE
        } else {
            SINGLE_BET_TYPE
        }
    }
}

fn parse_u256(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => U256::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn parse_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
