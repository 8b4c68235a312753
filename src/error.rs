use std::path::PathBuf;

use thiserror::Error;

use crate::infra::{Move, Position};

/// A coordinate outside the arena, usually a sign of a protocol decoding bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cell {position} is outside the {width}x{height} arena")]
pub struct InvalidCellError {
    pub position: Position,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error(transparent)]
    InvalidCell(#[from] InvalidCellError),
    #[error("agent position {0} is a wall")]
    AgentOnWall(Position),
    #[error("wall at {0} holds an occupant")]
    OccupiedWall(Position),
    #[error("arena dimensions {width}x{height} are empty")]
    EmptyArena { width: i32, height: i32 },
    #[error("arena dimensions {width}x{height} exceed the cell limit")]
    TooLarge { width: i32, height: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{identifier}'")]
pub struct UnknownStrategyError {
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("strategy '{identifier}' is already registered")]
pub struct DuplicateStrategyError {
    pub identifier: String,
}

/// A planner answered with a move the agent cannot make.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("strategy '{strategy}' chose {attempted:?}: {reason}")]
pub struct PlannerContractViolation {
    pub strategy: String,
    pub attempted: Move,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed turn message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("arena dimensions unknown: first message carried no config and no default is set")]
    MissingDimensions,
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    UnknownStrategy(#[from] UnknownStrategyError),
    #[error(transparent)]
    DuplicateStrategy(#[from] DuplicateStrategyError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("turn loop I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
