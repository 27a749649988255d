use thiserror::Error;

use crate::domain::{GameStatus, ParticipantId};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors surfaced by the price feed collaborator.
#[derive(Error, Debug, Clone)]
pub enum FeedError {
    #[error("price feed unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the order venue collaborator.
#[derive(Error, Debug, Clone)]
pub enum VenueError {
    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("venue unavailable: {0}")]
    Unavailable(String),
}

/// Lifecycle errors reported synchronously to `join`/`force_start` callers.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("operation not valid while game is {status}")]
    InvalidState { status: GameStatus },

    #[error("game already has {capacity} participants")]
    Full { capacity: usize },

    #[error("participant {participant} already joined")]
    DuplicateParticipant { participant: ParticipantId },

    #[error("no unassigned ball left despite {assigned} of {capacity} participants")]
    NoBallsAvailable { assigned: usize, capacity: usize },

    #[error("no game in progress")]
    NoGame,

    #[error("price feed unavailable during game start")]
    PriceFeed(#[source] FeedError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Venue(#[from] VenueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
