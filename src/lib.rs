//! Punter - a command-line agent for on-chain betting venues.
//!
//! Places, tracks, and settles wagers against a venue whose order flow
//! works in three legs: a REST book API that prepares EIP-712 order
//! payloads, GraphQL feeds that publish games and bet history, and
//! on-chain ERC-20 plumbing for allowances and claim settlement.
//!
//! # Order lifecycle
//!
//! 1. Request an order payload from the book API and decode its
//!    base64 envelope.
//! 2. Validate the payload and gate the destination against the
//!    profile's relayer before anything is signed.
//! 3. Reconcile a bounded token allowance (stake + relayer fee + a
//!    small buffer, never unlimited).
//! 4. Sign the payload's typed data with the bettor key and submit.
//! 5. Poll the order status endpoint until the venue settles, fails,
//!    or the attempt budget runs out.
//!
//! # Modules
//!
//! - [`config`] - Network profiles, paths, and logging setup
//! - [`domain`] - Venue-agnostic types: games, selections, odds,
//!   orders, bet history
//! - [`app`] - Order placement and claim workflows
//! - [`adapter`] - CLI frontend plus feed, chain, and book clients
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use punter::adapter::outbound::feed::{FeedClient, GamesQuery};
//! use punter::config::NetworkProfile;
//!
//! # async fn list() -> punter::error::Result<()> {
//! let profile = NetworkProfile::polygon();
//! let feed = FeedClient::new(&profile);
//! let games = feed.games(&GamesQuery::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

pub use error::{Error, Result};
