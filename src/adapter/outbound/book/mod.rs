//! Adapter for the betting venue: payload decoding and validation,
//! EIP-712 signing, order submission, and settlement polling.

pub mod orders;
pub mod payload;
pub mod signing;

pub use orders::{
    poll_order, BookClient, HttpStatusSource, PollSettings, StatusSource,
    DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
};
pub use payload::{api_base, decode_payload, Envelope, OrderPayload};
pub use signing::sign_order;
