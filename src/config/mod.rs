//! Configuration: network profiles, filesystem paths, and logging.

pub mod logging;
pub mod paths;
mod profile;

pub use profile::{NetworkProfile, PROFILE_ENV};
