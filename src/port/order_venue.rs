//! Order venue port: placement, cancellation, and fill monitoring.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{BallName, OrderId, Side};
use crate::error::VenueError;

/// A hedge order for one ball at its execution-stage price.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub ball: BallName,
    pub side: Side,
    /// Limit price.
    pub price: Decimal,
    /// Order size in asset units.
    pub size: Decimal,
}

/// External trading venue the orchestrator hedges through.
///
/// All operations are opaque asynchronous calls with a result or failure;
/// the core tolerates partial placement failure and treats any monitoring
/// failure as a signal to settle via the fallback path.
#[async_trait]
pub trait OrderVenue: Send + Sync {
    /// Place a single resting order, returning its venue identifier.
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, VenueError>;

    /// Best-effort cancellation of a batch of resting orders.
    async fn cancel_orders(&self, order_ids: &[OrderId]) -> Result<(), VenueError>;

    /// Resolve with the first of `order_ids` to fill.
    ///
    /// This abstracts a live fill-notification subscription. Any timeout is
    /// the implementation's concern; the primary settlement path waits
    /// indefinitely and relies on cancellation when the game is reset.
    async fn await_first_fill(&self, order_ids: &[OrderId]) -> Result<OrderId, VenueError>;
}
