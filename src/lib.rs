//! Ballrush - single-round price prediction game orchestrator.
//!
//! Twenty participants each claim a randomized "ball" tied to a price
//! target. Once the game fills, a live reference price is polled, hedge
//! orders are placed on a venue after a fixed delay, and the first order
//! to fill decides the winning ball. When the order path fails, a
//! price-proximity fallback settles the game instead.
//!
//! # Architecture
//!
//! The core is a mutex-guarded state machine (`PREPARING -> DRAWING ->
//! DONE`) driven by [`app::GameOrchestrator`]; external collaborators sit
//! behind ports:
//!
//! - **[`port::PriceFeed`]** - reference price on demand
//! - **[`port::OrderVenue`]** - order placement, cancellation, fill
//!   monitoring
//!
//! # Modules
//!
//! - [`config`] - TOML configuration and logging setup
//! - [`domain`] - game state, balls, slot pricing, status projection
//! - [`error`] - error types for the crate
//! - [`port`] - trait definitions for external collaborators
//! - [`adapter`] - the simulated feed/venue pair used by the demo binary
//! - [`app`] - the lifecycle orchestrator and its settings
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ballrush::adapter::{PaperVenue, SimFeed};
//! use ballrush::app::{GameOrchestrator, GameSettings};
//! use rust_decimal_macros::dec;
//!
//! # async fn run() -> Result<(), ballrush::error::Error> {
//! let feed = Arc::new(SimFeed::new(dec!(50000), dec!(5)));
//! let venue = Arc::new(PaperVenue::new(Arc::clone(&feed)));
//! let orchestrator = GameOrchestrator::new(feed, venue, GameSettings::default());
//!
//! orchestrator.join("player-01".into()).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
