//! Ports for external collaborators consumed by the game core.

pub mod order_venue;
pub mod price_feed;

pub use order_venue::{OrderRequest, OrderVenue};
pub use price_feed::PriceFeed;
