//! Mock [`PriceFeed`] implementations for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::FeedError;
use crate::port::PriceFeed;

/// Feed that always returns the same price.
pub struct StaticFeed {
    price: Decimal,
    calls: AtomicU32,
}

impl StaticFeed {
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            calls: AtomicU32::new(0),
        }
    }

    /// Number of `current_price` calls observed.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceFeed for StaticFeed {
    async fn current_price(&self) -> Result<Decimal, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.price)
    }
}

/// Feed popping pre-loaded results; once the script is exhausted it keeps
/// returning the last scripted price, or `Unavailable` if the script ended
/// on an error (or was empty).
pub struct ScriptedFeed {
    responses: Mutex<VecDeque<Result<Decimal, FeedError>>>,
    last: Mutex<Option<Result<Decimal, FeedError>>>,
}

impl ScriptedFeed {
    #[must_use]
    pub fn new(responses: Vec<Result<Decimal, FeedError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
        }
    }

    /// Convenience for a feed that fails every call.
    #[must_use]
    pub fn always_failing() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PriceFeed for ScriptedFeed {
    async fn current_price(&self) -> Result<Decimal, FeedError> {
        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            *self.last.lock().unwrap() = Some(next.clone());
            return next;
        }
        match self.last.lock().unwrap().clone() {
            Some(last) => last,
            None => Err(FeedError::Unavailable("script exhausted".into())),
        }
    }
}
