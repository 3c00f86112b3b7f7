//! Application layer: the order workflows the CLI drives.

pub mod workflow;

pub use workflow::{ClaimWorkflow, PlaceWorkflow, Tracking};
