//! Collaborator adapters. Only the in-process simulation ships with the
//! crate; real venue integrations live behind the same ports.

pub mod sim;

pub use sim::{PaperVenue, SimFeed};
