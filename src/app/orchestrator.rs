//! Game lifecycle orchestrator.
//!
//! Owns the single live [`Game`] behind a mutex and is its sole writer.
//! Join and reset requests are short synchronous critical sections; three
//! long-running activities may be in flight at once: the price-polling
//! loop, the one-shot execution timer, and the fill-monitoring wait during
//! settlement. None of them holds the lock across a suspension point —
//! state is re-read and re-validated after every await, because the game
//! may have been reset while a collaborator call was in flight.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{slots, Ball, BallName, Game, GameId, GameStatus, GameView, OrderId, ParticipantId, status};
use crate::error::GameError;
use crate::port::{OrderRequest, OrderVenue, PriceFeed};

use super::settings::GameSettings;

type SharedGame = Arc<Mutex<Option<Game>>>;

/// Result of force-starting a partially filled game.
#[derive(Debug)]
pub struct ForceStartOutcome {
    /// Auto-generated participant identifiers, in join order.
    pub synthesized: Vec<ParticipantId>,
    pub total_participants: usize,
    pub status: GameStatus,
}

/// Orchestrates one game at a time: registration, the drawing transition,
/// price polling, delayed order execution, and settlement.
pub struct GameOrchestrator {
    feed: Arc<dyn PriceFeed>,
    venue: Arc<dyn OrderVenue>,
    settings: GameSettings,
    state: SharedGame,
    /// Cancellation token for the current game's background activities.
    activities: Mutex<Option<CancellationToken>>,
}

impl GameOrchestrator {
    pub fn new(
        feed: Arc<dyn PriceFeed>,
        venue: Arc<dyn OrderVenue>,
        settings: GameSettings,
    ) -> Self {
        Self {
            feed,
            venue,
            settings,
            state: Arc::new(Mutex::new(None)),
            activities: Mutex::new(None),
        }
    }

    /// Register a participant and assign the next unclaimed ball.
    ///
    /// The join that fills the game triggers the drawing transition before
    /// returning. If the transition fails because the price feed is down,
    /// the error is returned but the join stays recorded — joins are never
    /// undone.
    pub async fn join(&self, participant: ParticipantId) -> Result<BallName, GameError> {
        let (ball, trigger) = {
            let mut guard = self.state.lock();
            let game = guard.get_or_insert_with(Game::new);
            let ball = game.register(participant.clone(), self.settings.capacity)?;
            // pin the filled game's identity while the lock is still held,
            // so the transition cannot act on a replacement installed by a
            // concurrent reset
            let trigger = (game.participant_count() == self.settings.capacity)
                .then(|| game.id().clone());
            (ball, trigger)
        };
        info!(participant = %participant, ball = %ball, "participant joined");

        if let Some(game_id) = trigger {
            self.transition_to_drawing(game_id).await?;
        }
        Ok(ball)
    }

    /// Fill the game with auto-generated participants and start it.
    ///
    /// Synthesized joins go through the same path as organic ones, so all
    /// join invariants apply, including the transition on the last one.
    pub async fn force_start(&self) -> Result<ForceStartOutcome, GameError> {
        let (missing, taken) = {
            let mut guard = self.state.lock();
            let game = guard.get_or_insert_with(Game::new);
            if game.status() != GameStatus::Preparing {
                return Err(GameError::InvalidState {
                    status: game.status(),
                });
            }
            let count = game.participant_count();
            if count >= self.settings.capacity {
                return Err(GameError::Full {
                    capacity: self.settings.capacity,
                });
            }
            let taken: HashSet<String> = game
                .participants()
                .iter()
                .map(|(p, _)| p.as_str().to_owned())
                .collect();
            (self.settings.capacity - count, taken)
        };

        let mut synthesized = Vec::with_capacity(missing);
        // skip suffixes organic participants already registered under
        let mut suffix = 0;
        while synthesized.len() < missing {
            suffix += 1;
            let name = format!("auto-participant-{suffix:02}");
            if taken.contains(&name) {
                continue;
            }
            let participant = ParticipantId::new(name);
            self.join(participant.clone()).await?;
            synthesized.push(participant);
        }

        let (total, status) = {
            let guard = self.state.lock();
            let game = guard.as_ref().ok_or(GameError::NoGame)?;
            (game.participant_count(), game.status())
        };
        info!(synthesized = synthesized.len(), total, "game force-started");
        Ok(ForceStartOutcome {
            synthesized,
            total_participants: total,
            status,
        })
    }

    /// Discard the current game and cancel its background activities.
    /// Safe to call from any status.
    ///
    /// Orders resting on the venue are not cancelled here: the execution
    /// task owns them and abandons them when it observes the cancellation.
    pub fn reset(&self) {
        let discarded = self.state.lock().take();
        if let Some(token) = self.activities.lock().take() {
            token.cancel();
        }
        if let Some(game) = discarded {
            info!(game = %game.id(), status = %game.status(), "game reset");
        }
    }

    /// Project the current game into the external status payload.
    #[must_use]
    pub fn project(&self) -> GameView {
        status::project(self.state.lock().as_ref())
    }

    /// Snapshot of the current game, if any.
    #[must_use]
    pub fn current_game(&self) -> Option<Game> {
        self.state.lock().clone()
    }

    /// Fetch the initial reference price and move the game into `Drawing`,
    /// spawning the polling loop and the execution timer.
    ///
    /// Acts only on the game identified by `game_id`, the one whose
    /// registration filled it; any replacement installed in the meantime is
    /// left untouched.
    async fn transition_to_drawing(&self, game_id: GameId) -> Result<(), GameError> {
        {
            let guard = self.state.lock();
            let game = guard.as_ref().ok_or(GameError::NoGame)?;
            if *game.id() != game_id || game.status() != GameStatus::Preparing {
                return Err(GameError::InvalidState {
                    status: game.status(),
                });
            }
        }

        // Suspension point: the game may be reset while this is in flight.
        let initial = self
            .feed
            .current_price()
            .await
            .map_err(GameError::PriceFeed)?;

        let token = CancellationToken::new();
        {
            let mut guard = self.state.lock();
            let game = guard.as_mut().ok_or(GameError::NoGame)?;
            if *game.id() != game_id || game.status() != GameStatus::Preparing {
                return Err(GameError::InvalidState {
                    status: game.status(),
                });
            }
            game.begin_drawing(initial, self.settings.display_step);
            *self.activities.lock() = Some(token.clone());
        }
        info!(game = %game_id, price = %initial, "drawing started");

        self.spawn_poll_loop(game_id.clone(), token.clone());
        self.spawn_execution_timer(game_id, token);
        Ok(())
    }

    fn spawn_poll_loop(&self, game_id: GameId, token: CancellationToken) {
        let state = Arc::clone(&self.state);
        let feed = Arc::clone(&self.feed);
        let interval = self.settings.poll_interval;
        tokio::spawn(async move {
            poll_prices(state, feed, game_id, interval, token).await;
        });
    }

    fn spawn_execution_timer(&self, game_id: GameId, token: CancellationToken) {
        let state = Arc::clone(&self.state);
        let feed = Arc::clone(&self.feed);
        let venue = Arc::clone(&self.venue);
        let settings = self.settings.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => return,
                () = tokio::time::sleep(settings.draw_duration) => {}
            }
            run_execution(state, feed, venue, settings, game_id, token).await;
        });
    }
}

/// Background loop storing the latest reference price while the game draws.
///
/// Fetch failures are logged and retried next tick. The loop exits when the
/// game leaves `Drawing`, is reset, or the token is cancelled; a late fetch
/// result observed after cancellation is discarded, never written.
async fn poll_prices(
    state: SharedGame,
    feed: Arc<dyn PriceFeed>,
    game_id: GameId,
    every: std::time::Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let drawing = {
            let guard = state.lock();
            matches!(
                guard.as_ref(),
                Some(game) if *game.id() == game_id && game.status() == GameStatus::Drawing
            )
        };
        if !drawing {
            break;
        }
        match feed.current_price().await {
            Ok(price) => {
                if token.is_cancelled() {
                    break;
                }
                let mut guard = state.lock();
                match guard.as_mut() {
                    Some(game) if *game.id() == game_id && game.status() == GameStatus::Drawing => {
                        game.set_current_price(price);
                    }
                    _ => break,
                }
            }
            Err(e) => warn!(error = %e, "price poll failed, retrying next tick"),
        }
    }
}

/// One-shot execution fired after the draw duration: place one hedge order
/// per ball, wait for the first fill, and settle the game. Any failure on
/// the primary path falls back to proximity-based winner selection; the
/// game always reaches `Done` once execution runs against a live game.
async fn run_execution(
    state: SharedGame,
    feed: Arc<dyn PriceFeed>,
    venue: Arc<dyn OrderVenue>,
    settings: GameSettings,
    game_id: GameId,
    token: CancellationToken,
) {
    // No-op if the game already ended or was reset.
    let balls: Vec<Ball> = {
        let guard = state.lock();
        match guard.as_ref() {
            Some(game) if *game.id() == game_id && game.status() == GameStatus::Drawing => {
                game.balls().to_vec()
            }
            _ => return,
        }
    };

    // Stage 1: price orders off a fresh market reference and place them
    // concurrently. Partial failures are tolerated; a dead feed or venue
    // just leaves nothing placed and settlement falls back.
    let placed: Vec<(BallName, OrderId)> = match feed.current_price().await {
        _ if token.is_cancelled() => return,
        Ok(mark) => {
            let requests: Vec<OrderRequest> = balls
                .iter()
                .map(|ball| {
                    let price = slots::execution_price(ball.name(), mark, settings.execution_step);
                    OrderRequest {
                        ball: ball.name(),
                        side: ball.side(),
                        price,
                        size: order_size(settings.order_notional, price),
                    }
                })
                .collect();
            let results = join_all(requests.iter().map(|request| {
                let venue = Arc::clone(&venue);
                async move { (request.ball, venue.place_order(request).await) }
            }))
            .await;

            let mut placed = Vec::new();
            for (ball, result) in results {
                match result {
                    Ok(order_id) => placed.push((ball, order_id)),
                    Err(e) => warn!(ball = %ball, error = %e, "order placement failed"),
                }
            }
            placed
        }
        Err(e) => {
            warn!(error = %e, "execution price fetch failed, settling via fallback");
            Vec::new()
        }
    };

    // Record placements, re-validating first: the game may have been reset
    // while orders were in flight, in which case they are orphans to cancel.
    let live = {
        let mut guard = state.lock();
        match guard.as_mut() {
            Some(game) if *game.id() == game_id && game.status() == GameStatus::Drawing => {
                for (ball, order_id) in &placed {
                    game.record_order(*ball, order_id.clone());
                }
                true
            }
            _ => false,
        }
    };
    if !live {
        let ids: Vec<OrderId> = placed.into_iter().map(|(_, id)| id).collect();
        abandon_orders(&venue, ids).await;
        return;
    }

    // Stage 2: wait for the first fill. No timeout on the primary path;
    // only reset cancels the wait.
    let mut winner: Option<BallName> = None;
    let mut leftovers: Vec<OrderId> = Vec::new();
    if !placed.is_empty() {
        let ids: Vec<OrderId> = placed.iter().map(|(_, id)| id.clone()).collect();
        let fill = tokio::select! {
            () = token.cancelled() => {
                abandon_orders(&venue, ids).await;
                return;
            }
            result = venue.await_first_fill(&ids) => result,
        };
        match fill {
            Ok(filled) => {
                winner = placed
                    .iter()
                    .find(|(_, id)| *id == filled)
                    .map(|(ball, _)| *ball);
                if winner.is_none() {
                    warn!(order = %filled, "fill for unknown order, settling via fallback");
                }
                leftovers = ids.into_iter().filter(|id| *id != filled).collect();
            }
            Err(e) => {
                warn!(error = %e, "fill monitoring failed, settling via fallback");
                leftovers = ids;
            }
        }
    } else {
        warn!(game = %game_id, "no orders placed, settling via fallback");
    }

    settle(&state, &game_id, winner, &token);
    abandon_orders(&venue, leftovers).await;
}

/// Move the game to `Done`, filling in the fallback winner if the primary
/// path produced none, and stop the polling loop.
fn settle(state: &SharedGame, game_id: &GameId, primary: Option<BallName>, token: &CancellationToken) {
    {
        let mut guard = state.lock();
        if let Some(game) = guard.as_mut() {
            if game.id() == game_id && game.status() == GameStatus::Drawing {
                let winner = primary.or_else(|| fallback_winner(game));
                game.finish(winner);
                match game.winner() {
                    Some(name) => info!(game = %game_id, winner = %name, "game settled"),
                    None => warn!(game = %game_id, "game settled without a winner"),
                }
            }
        }
    }
    token.cancel();
}

/// Fallback winner: among owned balls, the one with the target price closest
/// to the last known price (first-occurrence tie break); a uniform random
/// owned ball when no price was ever observed; none when nothing is owned.
fn fallback_winner(game: &Game) -> Option<BallName> {
    let owned: Vec<&Ball> = game.owned_balls().collect();
    if owned.is_empty() {
        return None;
    }
    match game.current_price() {
        Some(price) if price != Decimal::ZERO => {
            slots::closest_ball_to_price(owned.iter().copied(), price)
        }
        _ => owned
            .choose(&mut rand::thread_rng())
            .map(|ball| ball.name()),
    }
}

fn order_size(notional: Decimal, price: Decimal) -> Decimal {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    notional / price
}

/// Best-effort cancellation of orders the game no longer needs.
async fn abandon_orders(venue: &Arc<dyn OrderVenue>, ids: Vec<OrderId>) {
    if ids.is_empty() {
        return;
    }
    if let Err(e) = venue.cancel_orders(&ids).await {
        warn!(count = ids.len(), error = %e, "failed to cancel outstanding orders");
    }
}
