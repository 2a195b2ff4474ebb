use std::time::Duration;

use thiserror::Error;

use crate::agent::AgentError;

/// Errors surfaced to whoever operates the engine.
///
/// Agent misbehaviour never shows up here: it is downgraded to a fallback
/// move by the driver (see [`DecisionFault`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("A game needs at least 2 players, got {count}")]
    NotEnoughPlayers { count: usize },
    #[error("Player name {0:?} is used more than once")]
    DuplicatePlayer(String),
    #[error("No game in progress")]
    NoGameInProgress,
    #[error("Game already over")]
    GameAlreadyOver,
}

/// Invalid engine configuration. Fatal: the game never starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reason a proposed action was rejected in the current game context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("face {face} is outside 1..={faces}")]
    FaceOutOfRange { face: u8, faces: u8 },
    #[error("bid quantity must be at least 1")]
    ZeroQuantity,
    #[error("bid quantity {quantity} exceeds the {total} dice in play")]
    QuantityExceedsDice { quantity: u32, total: u32 },
    #[error("bid does not raise the current bid")]
    BidNotHigher,
    #[error("there is no bid to call")]
    NothingToChallenge,
    #[error("exact calls are disabled")]
    ExactCallDisabled,
}

/// Why a turn did not produce a usable action.
#[derive(Debug, Error)]
pub enum DecisionFault {
    #[error("illegal action: {0}")]
    Illegal(IllegalAction),
    #[error("no decision within {0:?}")]
    Timeout(Duration),
    #[error("agent error: {0}")]
    Agent(AgentError),
    #[error("agent panicked")]
    Panicked,
    #[error("agent task cancelled")]
    Cancelled,
}

impl DecisionFault {
    /// Short machine-readable tag used in events.
    pub fn kind(&self) -> &'static str {
        match self {
            DecisionFault::Illegal(_) => "illegal_action",
            DecisionFault::Timeout(_) => "timeout",
            DecisionFault::Agent(_) => "agent_error",
            DecisionFault::Panicked => "panicked",
            DecisionFault::Cancelled => "cancelled",
        }
    }
}
