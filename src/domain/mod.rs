//! Core domain types for the betting agent.
//!
//! - [`odds`]: fixed-point odds normalization
//! - [`Selection`] and friends: tradable selections from the game feed
//! - [`BetRequest`] and [`OrderStatus`]: order book wire types
//! - [`Bet`]: historical bets from the venue subgraph

mod bets;
mod order;
mod selection;
pub(crate) mod wire;

pub mod odds;

pub use bets::Bet;
pub use order::{BetRequest, OrderState, OrderStatus, SelectionRef};
pub use selection::{Condition, Game, Label, Named, Outcome, Selection};
