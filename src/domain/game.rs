//! The single live game instance and its state machine.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::GameError;

use super::ball::{Ball, BallName};
use super::id::{GameId, OrderId, ParticipantId};
use super::slots;

/// Lifecycle phase of a game. Transitions are forward-only:
/// `Preparing -> Drawing -> Done`, never skipping or reversing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Preparing,
    Drawing,
    Done,
}

impl GameStatus {
    /// Numeric code used by the external status payload.
    #[must_use]
    pub const fn as_code(self) -> u8 {
        match self {
            Self::Preparing => 0,
            Self::Drawing => 1,
            Self::Done => 2,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preparing => write!(f, "preparing"),
            Self::Drawing => write!(f, "drawing"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// One game: participants, balls, prices, and settlement outcome.
///
/// The orchestrator is the sole writer; all mutators are crate-private so
/// state can only change through the lifecycle operations.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    status: GameStatus,
    // insertion order is assignment order
    participants: Vec<(ParticipantId, BallName)>,
    balls: Vec<Ball>,
    initial_price: Option<Decimal>,
    current_price: Option<Decimal>,
    final_price: Option<Decimal>,
    placed_orders: Vec<OrderId>,
    winner: Option<BallName>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl Game {
    /// Create a fresh game in `Preparing` with a new identifier.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            id: GameId::new(),
            status: GameStatus::Preparing,
            participants: Vec::new(),
            balls: Vec::new(),
            initial_price: None,
            current_price: None,
            final_price: None,
            placed_orders: Vec::new(),
            winner: None,
            start_time: None,
            end_time: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &GameId {
        &self.id
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Participants in assignment order.
    #[must_use]
    pub fn participants(&self) -> &[(ParticipantId, BallName)] {
        &self.participants
    }

    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// All 20 balls in their fixed randomized order (empty before first join).
    #[must_use]
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    #[must_use]
    pub const fn initial_price(&self) -> Option<Decimal> {
        self.initial_price
    }

    #[must_use]
    pub const fn current_price(&self) -> Option<Decimal> {
        self.current_price
    }

    #[must_use]
    pub const fn final_price(&self) -> Option<Decimal> {
        self.final_price
    }

    #[must_use]
    pub fn placed_orders(&self) -> &[OrderId] {
        &self.placed_orders
    }

    #[must_use]
    pub const fn winner(&self) -> Option<BallName> {
        self.winner
    }

    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Balls that have been claimed by a participant.
    pub fn owned_balls(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|ball| ball.owner().is_some())
    }

    /// Map an order identifier back to the ball it was placed for.
    #[must_use]
    pub fn ball_for_order(&self, order_id: &OrderId) -> Option<&Ball> {
        self.balls
            .iter()
            .find(|ball| ball.order_id() == Some(order_id))
    }

    /// Register a participant and assign the next unclaimed ball.
    ///
    /// Slot generation is lazy and happens on the first registration. On the
    /// happy path the assigned ball name is returned; the caller is
    /// responsible for triggering the drawing transition when the
    /// registration fills the game.
    pub(crate) fn register(
        &mut self,
        participant: ParticipantId,
        capacity: usize,
    ) -> Result<BallName, GameError> {
        if self.status != GameStatus::Preparing {
            return Err(GameError::InvalidState {
                status: self.status,
            });
        }
        if self.participants.len() >= capacity {
            return Err(GameError::Full { capacity });
        }
        if self.participants.iter().any(|(p, _)| *p == participant) {
            return Err(GameError::DuplicateParticipant { participant });
        }

        if self.balls.is_empty() {
            self.balls = slots::generate_slots(&mut rand::thread_rng());
        }

        let assigned = self.participants.len();
        let ball = self
            .balls
            .iter_mut()
            .find(|ball| ball.owner().is_none())
            .ok_or(GameError::NoBallsAvailable { assigned, capacity })?;
        ball.claim(participant.clone());
        let name = ball.name();
        self.participants.push((participant, name));
        Ok(name)
    }

    /// Enter `Drawing`: record the initial price once, compute display-stage
    /// targets, and stamp the start time.
    pub(crate) fn begin_drawing(&mut self, initial_price: Decimal, step: Decimal) {
        debug_assert_eq!(self.status, GameStatus::Preparing);
        self.initial_price = Some(initial_price);
        self.current_price = Some(initial_price);
        slots::compute_targets(&mut self.balls, initial_price, step);
        self.status = GameStatus::Drawing;
        self.start_time = Some(Utc::now());
    }

    pub(crate) fn set_current_price(&mut self, price: Decimal) {
        self.current_price = Some(price);
    }

    /// Record a successfully placed order against its ball.
    pub(crate) fn record_order(&mut self, name: BallName, order_id: OrderId) {
        if let Some(ball) = self.balls.iter_mut().find(|ball| ball.name() == name) {
            ball.set_order_id(order_id.clone());
            self.placed_orders.push(order_id);
        }
    }

    /// Enter `Done`: set the winner (possibly none in the degenerate case),
    /// stamp the end time, and freeze the final price.
    pub(crate) fn finish(&mut self, winner: Option<BallName>) {
        debug_assert_eq!(self.status, GameStatus::Drawing);
        self.winner = winner;
        self.status = GameStatus::Done;
        self.end_time = Some(Utc::now());
        self.final_price = self.current_price;
    }
}
