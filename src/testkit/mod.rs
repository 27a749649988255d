//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`feed`] — Mock [`PriceFeed`](crate::port::PriceFeed) implementations:
//!   `StaticFeed`, `ScriptedFeed`.
//! - [`venue`] — `ScriptedVenue`, a mock
//!   [`OrderVenue`](crate::port::OrderVenue) with externally driven fills.

pub mod feed;
pub mod venue;

pub use feed::{ScriptedFeed, StaticFeed};
pub use venue::{FillScript, ScriptedVenue};
