//! Order wire types: the bet request sent to the venue and the order
//! status documents it hands back.
//!
//! The status endpoint signals settlement with a transaction hash
//! rather than a dedicated state, so [`OrderStatus`] keeps the raw
//! state string and exposes the lifecycle interpretation as methods.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::wire;

/// One (condition, outcome) pair inside a bet request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRef {
    pub condition_id: String,
    pub outcome_id: String,
}

/// The body POSTed to the venue when requesting an order payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    /// Stake in smallest token units.
    pub amount: u64,
    /// Minimum acceptable odds, scaled by 1e12.
    pub min_odds: u64,
    /// Chain slug the venue settles on, e.g. `polygon`.
    pub chain: String,
    /// Ordered selections; more than one makes this a combo bet.
    pub selections: Vec<SelectionRef>,
}

/// Lifecycle states reported by the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    Pending,
    Rejected,
    Canceled,
}

impl OrderState {
    /// Maps a wire state string onto the lifecycle. Anything the book
    /// has not terminally failed counts as pending.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "Rejected" => OrderState::Rejected,
            "Canceled" => OrderState::Canceled,
            _ => OrderState::Pending,
        }
    }

    #[must_use]
    pub const fn is_terminal_failure(self) -> bool {
        matches!(self, OrderState::Rejected | OrderState::Canceled)
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderState::Pending => "pending",
            OrderState::Rejected => "rejected",
            OrderState::Canceled => "canceled",
        };
        f.write_str(name)
    }
}

/// An order status document, as returned both on submission and by the
/// status endpoint. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    #[serde(default, deserialize_with = "wire::opt_loose_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OrderStatus {
    /// Lifecycle interpretation of the raw state string.
    #[must_use]
    pub fn order_state(&self) -> OrderState {
        self.state
            .as_deref()
            .map(OrderState::from_wire)
            .unwrap_or(OrderState::Pending)
    }

    /// The terminal failure state, if the book has reached one.
    #[must_use]
    pub fn terminal_failure(&self) -> Option<OrderState> {
        let state = self.order_state();
        state.is_terminal_failure().then_some(state)
    }

    /// The settlement transaction hash, once the book reports one.
    /// Empty strings count as absent.
    #[must_use]
    pub fn settled_tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref().filter(|hash| !hash.is_empty())
    }

    /// Venue-supplied failure reason, preferring the verbose field.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.error_message.as_deref().or(self.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bet_request_serializes_with_camel_case_fields() {
        let request = BetRequest {
            amount: 1_000_000,
            min_odds: 1_500_000_000_000,
            chain: "polygon".into(),
            selections: vec![SelectionRef {
                condition_id: "500100".into(),
                outcome_id: "29".into(),
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "amount": 1_000_000,
                "minOdds": 1_500_000_000_000u64,
                "chain": "polygon",
                "selections": [{"conditionId": "500100", "outcomeId": "29"}]
            })
        );
    }

    #[test]
    fn unknown_states_count_as_pending() {
        assert_eq!(OrderState::from_wire("Created"), OrderState::Pending);
        assert_eq!(OrderState::from_wire("Accepted"), OrderState::Pending);
        assert_eq!(OrderState::from_wire("Rejected"), OrderState::Rejected);
        assert_eq!(OrderState::from_wire("Canceled"), OrderState::Canceled);
    }

    #[test]
    fn terminal_failure_covers_rejected_and_canceled() {
        let rejected: OrderStatus =
            serde_json::from_str(r#"{"state": "Rejected", "errorMessage": "stale odds"}"#).unwrap();
        assert_eq!(rejected.terminal_failure(), Some(OrderState::Rejected));
        assert_eq!(rejected.failure_reason(), Some("stale odds"));

        let pending: OrderStatus = serde_json::from_str(r#"{"state": "Created"}"#).unwrap();
        assert_eq!(pending.terminal_failure(), None);
    }

    #[test]
    fn falls_back_to_the_short_error_field() {
        let status: OrderStatus =
            serde_json::from_str(r#"{"state": "Rejected", "error": "bad odds"}"#).unwrap();
        assert_eq!(status.failure_reason(), Some("bad odds"));
    }

    #[test]
    fn numeric_order_ids_decode_as_strings() {
        let status: OrderStatus = serde_json::from_str(r#"{"id": 987}"#).unwrap();
        assert_eq!(status.id.as_deref(), Some("987"));
    }

    #[test]
    fn empty_tx_hash_is_not_a_settlement() {
        let status: OrderStatus = serde_json::from_str(r#"{"txHash": ""}"#).unwrap();
        assert_eq!(status.settled_tx_hash(), None);

        let settled: OrderStatus = serde_json::from_str(r#"{"txHash": "0xabc"}"#).unwrap();
        assert_eq!(settled.settled_tx_hash(), Some("0xabc"));
    }

    #[test]
    fn empty_documents_decode_to_defaults() {
        let status: OrderStatus = serde_json::from_str("{}").unwrap();
        assert!(status.id.is_none());
        assert_eq!(status.order_state(), OrderState::Pending);
    }
}
