//! Mock [`OrderVenue`] with scripted placement results and externally
//! controlled fill delivery.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{BallName, OrderId};
use crate::error::VenueError;
use crate::port::{OrderRequest, OrderVenue};

type FillResult = Result<OrderId, VenueError>;

/// Venue double recording every placement and cancellation.
///
/// Placement results pop from a script queue (default `Ok`); fills are
/// delivered on demand through the paired [`FillScript`]. Dropping the
/// script makes `await_first_fill` fail with `Unavailable`, which is how
/// tests drive the fallback settlement path.
pub struct ScriptedVenue {
    place_results: Mutex<VecDeque<Result<(), VenueError>>>,
    next_id: AtomicU64,
    placed: Mutex<Vec<(OrderRequest, OrderId)>>,
    cancelled: Mutex<Vec<OrderId>>,
    fills: tokio::sync::Mutex<mpsc::UnboundedReceiver<FillResult>>,
}

/// Test handle delivering fill outcomes to a [`ScriptedVenue`].
pub struct FillScript(mpsc::UnboundedSender<FillResult>);

impl FillScript {
    /// Deliver a fill for the given order.
    pub fn fill(&self, order_id: OrderId) {
        let _ = self.0.send(Ok(order_id));
    }

    /// Fail the monitoring wait.
    pub fn fail(&self, reason: &str) {
        let _ = self.0.send(Err(VenueError::Unavailable(reason.into())));
    }
}

impl ScriptedVenue {
    /// Create a venue accepting every placement, plus its fill handle.
    #[must_use]
    pub fn new() -> (Self, FillScript) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                place_results: Mutex::new(VecDeque::new()),
                next_id: AtomicU64::new(1),
                placed: Mutex::new(Vec::new()),
                cancelled: Mutex::new(Vec::new()),
                fills: tokio::sync::Mutex::new(rx),
            },
            FillScript(tx),
        )
    }

    /// Queue per-call placement results; calls beyond the script succeed.
    pub fn script_placements(&self, results: Vec<Result<(), VenueError>>) {
        *self.place_results.lock().unwrap() = results.into();
    }

    /// Everything placed so far, in placement order.
    pub fn placed(&self) -> Vec<(OrderRequest, OrderId)> {
        self.placed.lock().unwrap().clone()
    }

    /// The order id placed for a given ball, if any.
    pub fn order_for_ball(&self, ball: BallName) -> Option<OrderId> {
        self.placed
            .lock()
            .unwrap()
            .iter()
            .find(|(request, _)| request.ball == ball)
            .map(|(_, id)| id.clone())
    }

    /// Everything cancelled so far.
    pub fn cancelled(&self) -> Vec<OrderId> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderVenue for ScriptedVenue {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, VenueError> {
        if let Some(result) = self.place_results.lock().unwrap().pop_front() {
            result?;
        }
        let id = OrderId::new(format!("ord-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.placed
            .lock()
            .unwrap()
            .push((request.clone(), id.clone()));
        Ok(id)
    }

    async fn cancel_orders(&self, order_ids: &[OrderId]) -> Result<(), VenueError> {
        self.cancelled.lock().unwrap().extend_from_slice(order_ids);
        Ok(())
    }

    async fn await_first_fill(&self, _order_ids: &[OrderId]) -> Result<OrderId, VenueError> {
        let mut fills = self.fills.lock().await;
        match fills.recv().await {
            Some(result) => result,
            None => Err(VenueError::Unavailable("fill script dropped".into())),
        }
    }
}
