//! Simulated collaborators for demo runs.
//!
//! [`SimFeed`] random-walks a price; [`PaperVenue`] rests orders in memory
//! and reports a fill once the simulated price crosses a limit. Neither
//! talks to a real venue; they exist so the binary can run a complete game
//! end to end without credentials.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use rust_decimal::Decimal;

use crate::domain::{OrderId, Side};
use crate::error::{FeedError, VenueError};
use crate::port::{OrderRequest, OrderVenue, PriceFeed};

/// Random-walk price feed. Each poll moves the price by a uniform step
/// within `±volatility`.
pub struct SimFeed {
    price: Mutex<Decimal>,
    volatility: Decimal,
}

impl SimFeed {
    #[must_use]
    pub fn new(start_price: Decimal, volatility: Decimal) -> Self {
        Self {
            price: Mutex::new(start_price),
            volatility,
        }
    }
}

#[async_trait]
impl PriceFeed for SimFeed {
    async fn current_price(&self) -> Result<Decimal, FeedError> {
        let ticks: i64 = rand::thread_rng().gen_range(-100..=100);
        let delta = self.volatility * Decimal::from(ticks) / Decimal::from(100);
        let mut price = self.price.lock();
        *price += delta;
        Ok(*price)
    }
}

/// In-memory venue: orders rest until the sim feed's price crosses their
/// limit. Long orders fill when the price trades down through the limit,
/// short orders when it trades up through it.
pub struct PaperVenue {
    feed: std::sync::Arc<SimFeed>,
    resting: Mutex<HashMap<OrderId, OrderRequest>>,
    next_id: AtomicU64,
}

impl PaperVenue {
    #[must_use]
    pub fn new(feed: std::sync::Arc<SimFeed>) -> Self {
        Self {
            feed,
            resting: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn crosses(request: &OrderRequest, price: Decimal) -> bool {
        match request.side {
            Side::Long => price <= request.price,
            Side::Short => price >= request.price,
        }
    }
}

#[async_trait]
impl OrderVenue for PaperVenue {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, VenueError> {
        let id = OrderId::new(format!("sim-{}", self.next_id.fetch_add(1, Ordering::Relaxed)));
        self.resting.lock().insert(id.clone(), request.clone());
        Ok(id)
    }

    async fn cancel_orders(&self, order_ids: &[OrderId]) -> Result<(), VenueError> {
        let mut resting = self.resting.lock();
        for id in order_ids {
            resting.remove(id);
        }
        Ok(())
    }

    async fn await_first_fill(&self, order_ids: &[OrderId]) -> Result<OrderId, VenueError> {
        loop {
            let price = self
                .feed
                .current_price()
                .await
                .map_err(|e| VenueError::Unavailable(e.to_string()))?;
            {
                let mut resting = self.resting.lock();
                for id in order_ids {
                    if let Some(request) = resting.get(id) {
                        if Self::crosses(request, price) {
                            resting.remove(id);
                            return Ok(id.clone());
                        }
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
