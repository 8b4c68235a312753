mod default_observer;
mod game_observer;
mod pathfinding;
pub mod protocol;
mod replay;
mod types;

pub use default_observer::DefaultObserver;
pub use game_observer::TurnObserver;
pub use pathfinding::{Distance, DistanceField, PathResult, Pathfinder, UnknownPolicy};
pub use protocol::{TurnDecoder, encode_move};
pub use replay::ReplayFile;
pub use types::{Move, Position};

