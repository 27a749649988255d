//! Price feed port.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::FeedError;

/// Supplies the current reference price for the tracked asset.
///
/// Calls may suspend for unbounded network-dependent time; the core never
/// holds a lock across them. Transient failures surface as
/// [`FeedError::Unavailable`] and are the caller's concern: the drawing
/// transition aborts on them, the polling loop retries next tick.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn current_price(&self) -> Result<Decimal, FeedError>;
}
