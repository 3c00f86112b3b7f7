//! EIP-712 signing of order payloads.
//!
//! The venue ships the domain, the type schemas, and the signable
//! message inside the payload itself, so the typed data is assembled
//! at runtime instead of from static type definitions. The signature
//! produced is the 65-byte `r || s || v` form, hex-encoded with a
//! `0x` prefix, which is what the submission endpoint expects.

use alloy_dyn_abi::TypedData;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use serde_json::json;
use tracing::debug;

use crate::error::{Result, SigningError};

use super::payload::OrderPayload;

/// Signs the payload's signable message under the schemas it carries.
///
/// Callers are expected to have validated the payload first; gaps
/// surface here as typed-data construction failures.
///
/// # Errors
///
/// Returns [`SigningError::TypedData`] when the payload's domain,
/// types, or message do not form valid EIP-712 typed data, and
/// [`SigningError::Sign`] when the signer fails.
pub async fn sign_order(signer: &PrivateKeySigner, payload: &OrderPayload) -> Result<String> {
    let primary_type = payload.primary_type();
    let typed_json = json!({
        "domain": payload.domain,
        "types": payload.types,
        "primaryType": primary_type,
        "message": payload.signable_client_bet_data,
    });
    let typed: TypedData =
        serde_json::from_value(typed_json).map_err(|err| SigningError::TypedData(err.to_string()))?;
    let digest = typed
        .eip712_signing_hash()
        .map_err(|err| SigningError::TypedData(err.to_string()))?;
    let signature = signer
        .sign_hash(&digest)
        .await
        .map_err(|err| SigningError::Sign(err.to_string()))?;
    debug!(primary_type, signer = %signer.address(), "order payload signed");
    Ok(format!("0x{}", hex::encode(signature.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::str::FromStr;

    const TEST_KEY: &str =
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn signer() -> PrivateKeySigner {
        PrivateKeySigner::from_str(TEST_KEY).unwrap()
    }

    fn payload_with(message: Value) -> OrderPayload {
        serde_json::from_value(json!({
            "domain": {
                "name": "Venue",
                "version": "1",
                "chainId": 137,
                "verifyingContract": "0x8dA05c0021e6b35865FDC959c54dCeF3A4AbBa9d"
            },
            "types": {
                "ClientBetData": [
                    {"name": "attention", "type": "string"},
                    {"name": "affiliate", "type": "address"},
                    {"name": "nonce", "type": "uint256"}
                ]
            },
            "signableClientBetData": message
        }))
        .unwrap()
    }

    fn bet_message(nonce: &str) -> Value {
        json!({
            "attention": "By signing this transaction, I agree to place a bet",
            "affiliate": "0x0000000000000000000000000000000000000000",
            "nonce": nonce
        })
    }

    #[tokio::test]
    async fn produces_a_prefixed_65_byte_signature() {
        let signature = sign_order(&signer(), &payload_with(bet_message("1")))
            .await
            .unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 2 + 65 * 2);
    }

    #[tokio::test]
    async fn signing_is_deterministic_for_the_same_message() {
        let payload = payload_with(bet_message("7"));
        let first = sign_order(&signer(), &payload).await.unwrap();
        let second = sign_order(&signer(), &payload).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn different_messages_sign_differently() {
        let first = sign_order(&signer(), &payload_with(bet_message("1")))
            .await
            .unwrap();
        let second = sign_order(&signer(), &payload_with(bet_message("2")))
            .await
            .unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn a_payload_without_schemas_cannot_be_signed() {
        let payload: OrderPayload = serde_json::from_value(json!({
            "signableClientBetData": {"nonce": "1"}
        }))
        .unwrap();
        let err = sign_order(&signer(), &payload).await.unwrap_err();
        assert!(err.to_string().contains("typed data"));
    }

    #[tokio::test]
    async fn a_message_that_violates_the_schema_is_rejected() {
        let payload = payload_with(json!({
            "attention": "bet",
            "affiliate": "not-an-address",
            "nonce": "1"
        }));
        assert!(sign_order(&signer(), &payload).await.is_err());
    }
}
