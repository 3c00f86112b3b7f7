//! Error types for the punter betting agent.
//!
//! Errors are grouped by the stage that produced them so a failure
//! always names the phase of the order lifecycle it came from: input
//! resolution, profile loading, feed queries, payload decoding, chain
//! transactions, signing, or the order book itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::OrderState;

/// Profile (configuration file) errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A profile field holds a value that cannot be used.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// Reading the profile file from disk failed.
    #[error("failed to read profile {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile file is not valid TOML. The raw content is kept so
    /// the CLI can render the offending span.
    #[error("failed to parse profile {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        content: String,
        #[source]
        source: toml::de::Error,
    },
}

/// User-supplied input that failed validation before any network call.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    /// The private key is malformed. The offending value is never
    /// echoed back.
    #[error("invalid private key: {reason}")]
    InvalidKey { reason: String },

    #[error("invalid amount '{value}': expected a positive integer in smallest token units")]
    InvalidAmount { value: String },

    #[error("invalid odds '{value}': expected a positive decimal such as 1.85")]
    InvalidOdds { value: String },

    #[error("invalid bet id '{value}': expected a positive integer")]
    InvalidBetId { value: String },

    #[error("selection list mismatch: {reason}")]
    SelectionMismatch { reason: String },

    #[error("missing required input: {field}")]
    Missing { field: &'static str },
}

/// Failures talking to the game data feed or the bet history subgraph.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("data feed request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("data feed returned HTTP {status}")]
    Status { status: u16 },

    #[error("data feed response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    /// The GraphQL layer answered 200 but reported query errors.
    #[error("data feed query failed: {0}")]
    Query(String),

    #[error("data feed response carried no data")]
    MissingData,

    #[error("data feed returned no tradable selections")]
    NoSelections,
}

/// Failures decoding or validating the base64 order payload returned
/// by the venue.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("venue response is missing the encoded payload")]
    MissingEncoded,

    #[error("payload is not valid base64: {0}")]
    Base64(#[source] base64::DecodeError),

    #[error("payload is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("payload is missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("payload field {field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The payload told us to authorize a contract other than the
    /// relayer configured in the profile. Signing is refused.
    #[error("payload destination {actual} does not match the configured relayer {expected}; refusing to sign")]
    DestinationMismatch { expected: String, actual: String },
}

/// On-chain read or transaction failures.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("rpc call failed: {0}")]
    Rpc(String),

    #[error("allowance transaction failed: {0}")]
    AllowanceTx(String),

    #[error("claim transaction failed: {0}")]
    ClaimTx(String),
}

/// Typed-data signing failures.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("failed to build typed data: {0}")]
    TypedData(String),

    #[error("failed to sign order: {0}")]
    Sign(String),
}

/// Failures from the order book: submission, status polling, and
/// terminal order states.
#[derive(Debug, Error)]
pub enum BookError {
    #[error("venue request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("venue returned HTTP {status}: {body}")]
    Request { status: u16, body: String },

    #[error("order submission failed with HTTP {status}: {body}")]
    Submission { status: u16, body: String },

    /// The venue moved the order to a terminal failure state.
    #[error("order {state} by the venue: {}", reason.as_deref().unwrap_or("no reason given"))]
    Terminal {
        state: OrderState,
        reason: Option<String>,
    },

    /// The order did not reach a terminal state within the polling
    /// window. It may still settle on the venue side.
    #[error("order not settled after {attempts} status checks; it may still settle later")]
    PollTimeout { attempts: u32 },

    #[error("order status response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Top-level error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Book(#[from] BookError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_name_the_field() {
        let err = InputError::Missing { field: "bet ids" };
        assert_eq!(err.to_string(), "missing required input: bet ids");
    }

    #[test]
    fn destination_mismatch_names_both_addresses() {
        let err = PayloadError::DestinationMismatch {
            expected: "0xaaa".into(),
            actual: "0xbbb".into(),
        };
        let message = err.to_string();
        assert!(message.contains("0xaaa"));
        assert!(message.contains("0xbbb"));
        assert!(message.contains("refusing to sign"));
    }

    #[test]
    fn terminal_error_reads_naturally_without_a_reason() {
        let err = BookError::Terminal {
            state: OrderState::Rejected,
            reason: None,
        };
        assert_eq!(err.to_string(), "order rejected by the venue: no reason given");
    }

    #[test]
    fn poll_timeout_notes_the_order_may_still_settle() {
        let err = BookError::PollTimeout { attempts: 60 };
        assert!(err.to_string().contains("may still settle"));
    }

    #[test]
    fn top_level_error_wraps_stage_errors_transparently() {
        let err: Error = FeedError::Status { status: 502 }.into();
        assert_eq!(err.to_string(), "data feed returned HTTP 502");
    }
}
