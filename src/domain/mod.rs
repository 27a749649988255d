//! Exchange-agnostic game domain: identifiers, balls, game state, slot
//! pricing, and the status projection.

pub mod ball;
pub mod game;
pub mod id;
pub mod slots;
pub mod status;

pub use ball::{Ball, BallName, Side, BALL_COUNT, FAMILY_SIZE};
pub use game::{Game, GameStatus};
pub use id::{GameId, OrderId, ParticipantId};
pub use status::{BallView, GameView};
