pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod infra;
pub mod planners;
pub mod state;
pub mod testing;

// Re-export commonly used types for convenience
pub use config::BotConfig;
pub use controller::BotController;
pub use error::BotError;
pub use game::Game;
pub use infra::{Move, Position};
pub use planners::{Planner, StrategyRegistry};
pub use state::ArenaState;
