use std::collections::HashMap;

use crate::error::InvalidCellError;
use crate::infra::Position;
use crate::state::{ArenaState, Occupant, Terrain};

/// Read-only query view over one [`ArenaState`].
pub struct GridIndex<'a> {
    state: &'a ArenaState,
    occupants: HashMap<Position, Occupant>,
}

impl<'a> GridIndex<'a> {
    pub fn new(state: &'a ArenaState) -> Self {
        let mut occupants = HashMap::new();
        for gem in state.gems() {
            occupants.insert(gem.position, Occupant::Gem);
        }
        // Enemies shadow gems they stand on, the agent shadows everything.
        for enemy in state.enemies() {
            occupants.insert(*enemy, Occupant::Enemy);
        }
        occupants.insert(state.agent(), Occupant::Agent);
        Self { state, occupants }
    }

    pub fn state(&self) -> &'a ArenaState {
        self.state
    }

    pub fn terrain(&self, pos: Position) -> Result<Terrain, InvalidCellError> {
        self.state.checked(pos)?;
        Ok(self.state.terrain_at(&pos).unwrap_or(Terrain::Unknown))
    }

    pub fn occupant(&self, pos: Position) -> Result<Occupant, InvalidCellError> {
        self.state.checked(pos)?;
        Ok(self.occupants.get(&pos).copied().unwrap_or(Occupant::None))
    }

    /// In-bounds, non-wall orthogonal neighbours in tie-break order.
    /// Unknown cells are included; traversal policy is the pathfinder's concern.
    pub fn neighbors(&self, pos: Position) -> Result<Vec<Position>, InvalidCellError> {
        self.state.checked(pos)?;
        Ok(self.open_neighbors(pos).collect())
    }

    pub fn is_visible(&self, pos: Position) -> Result<bool, InvalidCellError> {
        Ok(self.terrain(pos)? != Terrain::Unknown)
    }

    /// Allocation-free neighbour walk for callers that already hold an in-bounds cell.
    pub(crate) fn open_neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().into_iter().filter(|n| {
            matches!(
                self.state.terrain_at(n),
                Some(Terrain::Empty | Terrain::Unknown)
            )
        })
    }

    /// Whether the agent may end its turn on `pos`.
    pub fn is_legal_destination(&self, pos: Position) -> bool {
        matches!(
            self.state.terrain_at(&pos),
            Some(Terrain::Empty | Terrain::Unknown)
        )
    }

    /// Unknown in-bounds cells within Manhattan `radius` of `pos`.
    pub fn unknown_within(&self, pos: Position, radius: i32) -> usize {
        // No window needs to reach past the far corner.
        let radius = radius.clamp(0, self.state.width() + self.state.height());
        let mut count = 0;
        for dy in (-radius).max(-pos.y)..=radius.min(self.state.height() - 1 - pos.y) {
            let span = radius - dy.abs();
            for dx in (-span).max(-pos.x)..=span.min(self.state.width() - 1 - pos.x) {
                let cell = Position::new(pos.x + dx, pos.y + dy);
                if self.state.terrain_at(&cell) == Some(Terrain::Unknown) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Manhattan length of the arena diagonal, never zero.
    pub fn diagonal(&self) -> f64 {
        ((self.state.width() - 1) + (self.state.height() - 1)).max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parse_arena;

    #[test]
    fn test_neighbors_exclude_walls_and_bounds() {
        let state = parse_arena(&[
            "A#.", //
            "...",
        ]);
        let grid = GridIndex::new(&state);
        let neighbors = grid.neighbors(Position::new(0, 0)).unwrap();
        assert_eq!(neighbors, vec![Position::new(0, 1)]);
    }

    #[test]
    fn test_neighbors_keep_unknown_cells() {
        let state = parse_arena(&[
            "?A?", //
            "#?#",
        ]);
        let grid = GridIndex::new(&state);
        let neighbors = grid.neighbors(Position::new(1, 0)).unwrap();
        assert_eq!(
            neighbors,
            vec![Position::new(1, 1), Position::new(0, 0), Position::new(2, 0)]
        );
    }

    #[test]
    fn test_out_of_bounds_queries_fail() {
        let state = parse_arena(&["A."]);
        let grid = GridIndex::new(&state);
        let bad = Position::new(5, 0);
        assert_eq!(
            grid.terrain(bad),
            Err(InvalidCellError {
                position: bad,
                width: 2,
                height: 1
            })
        );
        assert!(grid.occupant(bad).is_err());
        assert!(grid.neighbors(Position::new(-1, 0)).is_err());
        assert!(grid.is_visible(Position::new(0, 1)).is_err());
    }

    #[test]
    fn test_occupants_and_visibility() {
        let state = parse_arena(&[
            "AGE", //
            "?.#",
        ]);
        let grid = GridIndex::new(&state);
        assert_eq!(grid.occupant(Position::new(0, 0)), Ok(Occupant::Agent));
        assert_eq!(grid.occupant(Position::new(1, 0)), Ok(Occupant::Gem));
        assert_eq!(grid.occupant(Position::new(2, 0)), Ok(Occupant::Enemy));
        assert_eq!(grid.occupant(Position::new(1, 1)), Ok(Occupant::None));
        assert_eq!(grid.is_visible(Position::new(0, 1)), Ok(false));
        assert_eq!(grid.is_visible(Position::new(2, 1)), Ok(true));
        assert_eq!(grid.terrain(Position::new(2, 1)), Ok(Terrain::Wall));
    }

    #[test]
    fn test_unknown_within_radius() {
        let state = parse_arena(&[
            "???", //
            "?A?", //
            "???",
        ]);
        let grid = GridIndex::new(&state);
        assert_eq!(grid.unknown_within(Position::new(1, 1), 1), 4);
        assert_eq!(grid.unknown_within(Position::new(1, 1), 2), 8);
        assert_eq!(grid.unknown_within(Position::new(0, 0), i32::MAX), 8);
        assert_eq!(grid.unknown_within(Position::new(1, 1), -3), 0);
    }
}
