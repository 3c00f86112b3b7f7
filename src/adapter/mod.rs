//! Adapters between the outside world and the order workflows.
//!
//! Inbound adapters drive the application (the CLI); outbound ones
//! are driven by it (feed, chain, book).

pub mod inbound;
pub mod outbound;
