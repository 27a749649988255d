//! Read-only projection of game state into the external status payload.

use rust_decimal::Decimal;
use serde::Serialize;

use super::ball::Ball;
use super::game::Game;

/// One owned ball as shown to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BallView {
    pub ball_name: String,
    pub target_price: Decimal,
    /// Owner's participant identifier.
    pub uuid: String,
}

impl BallView {
    fn from_ball(ball: &Ball) -> Option<Self> {
        let owner = ball.owner()?;
        Some(Self {
            ball_name: ball.name().to_string(),
            target_price: ball.target_price(),
            uuid: owner.to_string(),
        })
    }
}

/// External status payload. Callable at any point in the lifecycle; all
/// fields are zero/empty until the underlying state exists.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    /// 0 = preparing, 1 = drawing, 2 = done.
    pub status: u8,
    pub realtime_price: Decimal,
    pub final_price: Decimal,
    /// Only balls that have been claimed.
    pub balls: Vec<BallView>,
    /// Winning ball name, empty until settlement.
    pub winner: String,
    /// Initial price recorded at the drawing transition, 0 until then.
    pub p0: Decimal,
    /// Drawing start time as unix seconds, 0 until the game starts.
    pub t0: i64,
}

impl GameView {
    fn empty() -> Self {
        Self {
            status: 0,
            realtime_price: Decimal::ZERO,
            final_price: Decimal::ZERO,
            balls: Vec::new(),
            winner: String::new(),
            p0: Decimal::ZERO,
            t0: 0,
        }
    }
}

/// Project a game (or its absence) into the external payload. Pure; no
/// side effects.
#[must_use]
pub fn project(game: Option<&Game>) -> GameView {
    let Some(game) = game else {
        return GameView::empty();
    };

    GameView {
        status: game.status().as_code(),
        realtime_price: game.current_price().unwrap_or(Decimal::ZERO),
        final_price: game.final_price().unwrap_or(Decimal::ZERO),
        balls: game.balls().iter().filter_map(BallView::from_ball).collect(),
        winner: game
            .winner()
            .map(|name| name.to_string())
            .unwrap_or_default(),
        p0: game.initial_price().unwrap_or(Decimal::ZERO),
        t0: game.start_time().map(|t| t.timestamp()).unwrap_or(0),
    }
}
