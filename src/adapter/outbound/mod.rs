//! Outbound adapters: the data feed, the chain, and the order book.

pub mod book;
pub mod chain;
pub mod feed;
