//! Order book client: payload requests, order submission, and
//! settlement polling.

use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::NetworkProfile;
use crate::domain::{BetRequest, OrderStatus};
use crate::error::{BookError, PayloadError, Result};

use super::payload::{decode_payload, Envelope, OrderPayload};

/// Default pause between order status checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
/// Default number of status checks before giving up.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 60;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often and how long to poll for settlement.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

/// Source of order status documents. The seam keeps the poller
/// testable without a live book behind it.
#[async_trait]
pub trait StatusSource {
    async fn fetch(&self, order_id: &str) -> Result<OrderStatus>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimRequest<'a> {
    bet_ids: &'a [u64],
    chain: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitOrderBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<&'a str>,
    bettor: String,
    bet_owner: String,
    client_bet_data: Option<&'a Value>,
    bettor_signature: &'a str,
}

/// Client for the venue's agent endpoints and order status API.
#[derive(Debug, Clone)]
pub struct BookClient {
    http: Client,
    base_url: String,
}

impl BookClient {
    #[must_use]
    pub fn new(profile: &NetworkProfile) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!("falling back to default HTTP client: {err}");
                Client::new()
            });
        Self {
            http,
            base_url: profile.book_api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Requests and decodes an order payload for a bet.
    ///
    /// # Errors
    ///
    /// Returns a [`BookError`] when the request fails and a
    /// [`PayloadError`] when the envelope does not decode.
    pub async fn bet_payload(&self, request: &BetRequest) -> Result<OrderPayload> {
        let url = format!("{}/agent/bet", self.base_url);
        debug!(
            %url,
            amount = request.amount,
            selections = request.selections.len(),
            "requesting bet payload"
        );
        let envelope = self.post_for_envelope(&url, request).await?;
        decode_payload(&envelope)
    }

    /// Requests and decodes a claim payload for settled bets.
    ///
    /// # Errors
    ///
    /// Returns a [`BookError`] when the request fails and a
    /// [`PayloadError`] when the envelope does not decode.
    pub async fn claim_payload(&self, bet_ids: &[u64], chain: &str) -> Result<OrderPayload> {
        let url = format!("{}/agent/claim", self.base_url);
        debug!(%url, bets = bet_ids.len(), chain, "requesting claim payload");
        let body = ClaimRequest { bet_ids, chain };
        let envelope = self.post_for_envelope(&url, &body).await?;
        decode_payload(&envelope)
    }

    /// Submits a signed order to the payload's submission URL. Both
    /// bettor fields are sent lowercased; the venue compares them
    /// against the signature textually.
    ///
    /// A 2xx answer is returned as the order status document, empty
    /// when the body is not one. Terminal interpretation stays with
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Submission`] with the response body when
    /// the venue refuses the order.
    pub async fn submit_order(
        &self,
        payload: &OrderPayload,
        signature: &str,
        bettor: Address,
    ) -> Result<OrderStatus> {
        let url = payload.submit_url()?;
        let bettor = bettor.to_string().to_ascii_lowercase();
        let body = SubmitOrderBody {
            environment: payload.environment.as_deref(),
            bet_owner: bettor.clone(),
            bettor,
            client_bet_data: payload.api_client_bet_data.as_ref(),
            bettor_signature: signature,
        };
        info!(%url, "submitting signed order");
        let response = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(BookError::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(BookError::Transport)?;
        if !status.is_success() {
            return Err(BookError::Submission {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    /// Status source rooted at an order status API base.
    #[must_use]
    pub fn status_source(&self, api_base: &str) -> HttpStatusSource {
        HttpStatusSource {
            http: self.http.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    async fn post_for_envelope<B>(&self, url: &str, body: &B) -> Result<Envelope>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(BookError::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(BookError::Transport)?;
        if !status.is_success() {
            return Err(BookError::Request {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }
        serde_json::from_str(&text).map_err(|err| PayloadError::Json(err).into())
    }
}

/// Fetches order status documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    http: Client,
    api_base: String,
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self, order_id: &str) -> Result<OrderStatus> {
        let url = format!("{}/bet/orders/{}", self.api_base, order_id);
        let response = self.http.get(&url).send().await.map_err(BookError::Transport)?;
        let status = response.status();
        let text = response.text().await.map_err(BookError::Transport)?;
        if !status.is_success() {
            return Err(BookError::Request {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }
        serde_json::from_str(&text).map_err(|err| BookError::Decode(err).into())
    }
}

/// Polls the status source until the order settles, fails terminally,
/// or the attempt budget runs out.
///
/// # Errors
///
/// Returns [`BookError::Terminal`] when the book rejects or cancels
/// the order, and [`BookError::PollTimeout`] when the budget is spent
/// without a settlement. A timed-out order may still settle later.
pub async fn poll_order<S>(source: &S, order_id: &str, settings: PollSettings) -> Result<OrderStatus>
where
    S: StatusSource + ?Sized,
{
    for attempt in 1..=settings.max_attempts {
        let status = source.fetch(order_id).await?;
        if let Some(state) = status.terminal_failure() {
            return Err(BookError::Terminal {
                state,
                reason: status.failure_reason().map(str::to_string),
            }
            .into());
        }
        if status.settled_tx_hash().is_some() {
            info!(attempt, order_id, "order settled");
            return Ok(status);
        }
        debug!(attempt, max = settings.max_attempts, "order still pending");
        if attempt < settings.max_attempts {
            tokio::time::sleep(settings.interval).await;
        }
    }
    Err(BookError::PollTimeout {
        attempts: settings.max_attempts,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderState;
    use crate::error::Error;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct Scripted {
        responses: Mutex<VecDeque<OrderStatus>>,
    }

    impl Scripted {
        fn new(responses: Vec<OrderStatus>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl StatusSource for Scripted {
        async fn fetch(&self, _order_id: &str) -> Result<OrderStatus> {
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("status script exhausted"))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl StatusSource for Unreachable {
        async fn fetch(&self, _order_id: &str) -> Result<OrderStatus> {
            Err(BookError::Request {
                status: 502,
                body: "bad gateway".into(),
            }
            .into())
        }
    }

    fn status(json: &str) -> OrderStatus {
        serde_json::from_str(json).unwrap()
    }

    fn fast(max_attempts: u32) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn settles_once_a_tx_hash_appears() {
        let source = Scripted::new(vec![
            status(r#"{"state": "Created"}"#),
            status(r#"{"state": "Pending"}"#),
            status(r#"{"state": "Accepted", "txHash": "0xabc"}"#),
        ]);
        let settled = poll_order(&source, "order-1", fast(10)).await.unwrap();
        assert_eq!(settled.settled_tx_hash(), Some("0xabc"));
    }

    #[tokio::test]
    async fn rejection_stops_the_poll_immediately() {
        let source = Scripted::new(vec![status(
            r#"{"state": "Rejected", "errorMessage": "odds moved"}"#,
        )]);
        let err = poll_order(&source, "order-1", fast(10)).await.unwrap_err();
        match err {
            Error::Book(BookError::Terminal { state, reason }) => {
                assert_eq!(state, OrderState::Rejected);
                assert_eq!(reason.as_deref(), Some("odds moved"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn cancellation_is_terminal_too() {
        let source = Scripted::new(vec![status(r#"{"state": "Canceled"}"#)]);
        let err = poll_order(&source, "order-1", fast(10)).await.unwrap_err();
        match err {
            Error::Book(BookError::Terminal { state, reason }) => {
                assert_eq!(state, OrderState::Canceled);
                assert_eq!(reason, None);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn an_empty_tx_hash_does_not_count_as_settled() {
        let source = Scripted::new(vec![
            status(r#"{"state": "Pending", "txHash": ""}"#),
            status(r#"{"state": "Accepted", "txHash": "0xdef"}"#),
        ]);
        let settled = poll_order(&source, "order-1", fast(10)).await.unwrap();
        assert_eq!(settled.settled_tx_hash(), Some("0xdef"));
    }

    #[tokio::test]
    async fn times_out_after_the_attempt_budget() {
        let source = Scripted::new(vec![status(r#"{"state": "Pending"}"#); 3]);
        let err = poll_order(&source, "order-1", fast(3)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Book(BookError::PollTimeout { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn source_errors_propagate_unchanged() {
        let err = poll_order(&Unreachable, "order-1", fast(5)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Book(BookError::Request { status: 502, .. })
        ));
    }

    #[test]
    fn default_poll_settings_match_the_documented_cadence() {
        let settings = PollSettings::default();
        assert_eq!(settings.interval, Duration::from_millis(2_000));
        assert_eq!(settings.max_attempts, 60);
    }

    #[test]
    fn submit_body_lowercases_owners_and_omits_a_missing_environment() {
        let bettor: Address = "0x8dA05c0021e6b35865FDC959c54dCeF3A4AbBa9d"
            .parse()
            .unwrap();
        let lowered = bettor.to_string().to_ascii_lowercase();
        let body = SubmitOrderBody {
            environment: None,
            bettor: lowered.clone(),
            bet_owner: lowered,
            client_bet_data: None,
            bettor_signature: "0xsig",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("environment").is_none());
        assert!(value["clientBetData"].is_null());
        assert_eq!(value["bettorSignature"], "0xsig");
        assert_eq!(
            value["bettor"],
            "0x8da05c0021e6b35865fdc959c54dcef3a4abba9d"
        );
        assert_eq!(value["betOwner"], value["bettor"]);
    }

    #[test]
    fn claim_request_serializes_in_wire_shape() {
        let body = ClaimRequest {
            bet_ids: &[11, 12],
            chain: "polygon",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["betIds"], serde_json::json!([11, 12]));
        assert_eq!(value["chain"], "polygon");
    }
}
