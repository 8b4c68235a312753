mod arena;
mod grid_index;

pub use arena::{ArenaBuilder, ArenaState, Gem, Occupant, Terrain};
pub use grid_index::GridIndex;
