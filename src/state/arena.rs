use std::collections::HashMap;

use crate::error::{ArenaError, InvalidCellError};
use crate::infra::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Empty,
    Wall,
    /// Never observed.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    None,
    Gem,
    Enemy,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Gem {
    pub position: Position,
    /// Turns left before the gem disappears, when the protocol tells us.
    pub ttl: Option<i32>,
}

/// Immutable snapshot of one turn. Built through [`ArenaBuilder`], which enforces
/// that the agent stands on a non-wall cell inside the arena and that walls are
/// never occupied.
#[derive(Debug, Clone)]
pub struct ArenaState {
    width: i32,
    height: i32,
    terrain: Vec<Terrain>,
    agent: Position,
    gems: Vec<Gem>,
    enemies: Vec<Position>,
    last_seen: Vec<Option<u32>>,
    tick: u32,
    initiative: bool,
}

impl ArenaState {
    /// Largest arena accepted, in cells.
    pub const MAX_CELLS: i64 = 1 << 20;

    pub fn builder(width: i32, height: i32) -> ArenaBuilder {
        ArenaBuilder::new(width, height)
    }

    /// Rejects empty arenas and arenas with more than [`Self::MAX_CELLS`] cells.
    pub fn check_dimensions(width: i32, height: i32) -> Result<usize, ArenaError> {
        if width <= 0 || height <= 0 {
            return Err(ArenaError::EmptyArena { width, height });
        }
        let cells = i64::from(width) * i64::from(height);
        if cells > Self::MAX_CELLS {
            return Err(ArenaError::TooLarge { width, height });
        }
        usize::try_from(cells).map_err(|_| ArenaError::TooLarge { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn agent(&self) -> Position {
        self.agent
    }

    pub fn gems(&self) -> &[Gem] {
        &self.gems
    }

    pub fn enemies(&self) -> &[Position] {
        &self.enemies
    }

    /// Whether the agent moves before the enemies this turn.
    pub fn initiative(&self) -> bool {
        self.initiative
    }

    /// Last tick the cell was observed as floor, if ever.
    pub fn last_seen(&self, pos: &Position) -> Option<u32> {
        self.index(pos).and_then(|i| self.last_seen[i])
    }

    pub fn cell_count(&self) -> usize {
        self.terrain.len()
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Row-major index of an in-bounds cell.
    pub fn index(&self, pos: &Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn position_of(&self, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }

    pub fn terrain_at(&self, pos: &Position) -> Option<Terrain> {
        self.index(pos).map(|i| self.terrain[i])
    }

    pub fn checked(&self, pos: Position) -> Result<usize, InvalidCellError> {
        self.index(&pos).ok_or(InvalidCellError {
            position: pos,
            width: self.width,
            height: self.height,
        })
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.terrain.len()).map(|i| self.position_of(i))
    }

    pub fn unknown_count(&self) -> usize {
        self.terrain.iter().filter(|t| **t == Terrain::Unknown).count()
    }

    /// ASCII rendering for logs: `#` wall, `.` empty, `?` unknown,
    /// `A` agent, `G` gem, `E` enemy.
    pub fn draw_ascii_map(&self) -> String {
        let mut rows = Vec::with_capacity(self.height as usize);
        for y in 0..self.height {
            let mut row = String::with_capacity(self.width as usize);
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let ch = if pos == self.agent {
                    'A'
                } else if self.enemies.contains(&pos) {
                    'E'
                } else if self.gems.iter().any(|g| g.position == pos) {
                    'G'
                } else {
                    match self.terrain[(y * self.width + x) as usize] {
                        Terrain::Empty => '.',
                        Terrain::Wall => '#',
                        Terrain::Unknown => '?',
                    }
                };
                row.push(ch);
            }
            rows.push(row);
        }
        rows.join("\n")
    }
}

/// Collects one turn's observations and validates them into an [`ArenaState`].
#[derive(Debug, Clone)]
pub struct ArenaBuilder {
    width: i32,
    height: i32,
    fill: Terrain,
    terrain: HashMap<Position, Terrain>,
    agent: Position,
    gems: Vec<Gem>,
    enemies: Vec<Position>,
    last_seen: HashMap<Position, u32>,
    tick: u32,
    initiative: bool,
}

impl ArenaBuilder {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            fill: Terrain::Unknown,
            terrain: HashMap::new(),
            agent: Position::new(0, 0),
            gems: Vec::new(),
            enemies: Vec::new(),
            last_seen: HashMap::new(),
            tick: 0,
            initiative: false,
        }
    }

    /// Terrain used for cells that are not set explicitly.
    pub fn fill(mut self, terrain: Terrain) -> Self {
        self.fill = terrain;
        self
    }

    pub fn terrain(mut self, pos: Position, terrain: Terrain) -> Self {
        self.terrain.insert(pos, terrain);
        self
    }

    pub fn wall(self, pos: Position) -> Self {
        self.terrain(pos, Terrain::Wall)
    }

    pub fn agent(mut self, pos: Position) -> Self {
        self.agent = pos;
        self
    }

    pub fn gem(mut self, pos: Position, ttl: Option<i32>) -> Self {
        self.gems.push(Gem { position: pos, ttl });
        self
    }

    pub fn enemy(mut self, pos: Position) -> Self {
        self.enemies.push(pos);
        self
    }

    pub fn tick(mut self, tick: u32) -> Self {
        self.tick = tick;
        self
    }

    pub fn initiative(mut self, initiative: bool) -> Self {
        self.initiative = initiative;
        self
    }

    /// Records the last tick `pos` was seen as floor.
    pub fn seen(mut self, pos: Position, tick: u32) -> Self {
        self.last_seen.insert(pos, tick);
        self
    }

    pub fn build(self) -> Result<ArenaState, ArenaError> {
        let cells = ArenaState::check_dimensions(self.width, self.height)?;

        let mut state = ArenaState {
            width: self.width,
            height: self.height,
            terrain: vec![self.fill; cells],
            agent: self.agent,
            gems: Vec::with_capacity(self.gems.len()),
            enemies: Vec::with_capacity(self.enemies.len()),
            last_seen: vec![None; cells],
            tick: self.tick,
            initiative: self.initiative,
        };

        for (pos, terrain) in &self.terrain {
            let index = state.checked(*pos)?;
            state.terrain[index] = *terrain;
        }
        for (pos, tick) in &self.last_seen {
            let index = state.checked(*pos)?;
            state.last_seen[index] = Some(*tick);
        }

        let agent_index = state.checked(self.agent)?;
        match state.terrain[agent_index] {
            Terrain::Wall => return Err(ArenaError::AgentOnWall(self.agent)),
            // The agent always knows the cell it stands on.
            Terrain::Unknown => state.terrain[agent_index] = Terrain::Empty,
            Terrain::Empty => {}
        }

        for gem in self.gems {
            let index = state.checked(gem.position)?;
            if state.terrain[index] == Terrain::Wall {
                return Err(ArenaError::OccupiedWall(gem.position));
            }
            state.gems.push(gem);
        }
        for enemy in self.enemies {
            let index = state.checked(enemy)?;
            if state.terrain[index] == Terrain::Wall {
                return Err(ArenaError::OccupiedWall(enemy));
            }
            state.enemies.push(enemy);
        }

        // Sorted so every downstream iteration is deterministic.
        state.gems.sort();
        state.gems.dedup_by_key(|g| g.position);
        state.enemies.sort();
        state.enemies.dedup();

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_agent_on_wall() {
        let result = ArenaState::builder(3, 3)
            .fill(Terrain::Empty)
            .wall(Position::new(1, 1))
            .agent(Position::new(1, 1))
            .build();
        assert_eq!(result.unwrap_err(), ArenaError::AgentOnWall(Position::new(1, 1)));
    }

    #[test]
    fn test_build_rejects_out_of_bounds_gem() {
        let result = ArenaState::builder(3, 3)
            .fill(Terrain::Empty)
            .gem(Position::new(3, 0), None)
            .build();
        assert!(matches!(result, Err(ArenaError::InvalidCell(_))));
    }

    #[test]
    fn test_build_rejects_enemy_on_wall() {
        let result = ArenaState::builder(3, 3)
            .fill(Terrain::Empty)
            .wall(Position::new(2, 2))
            .enemy(Position::new(2, 2))
            .build();
        assert_eq!(result.unwrap_err(), ArenaError::OccupiedWall(Position::new(2, 2)));
    }

    #[test]
    fn test_agent_cell_is_known() {
        let state = ArenaState::builder(4, 4).agent(Position::new(2, 1)).build().unwrap();
        assert_eq!(state.terrain_at(&Position::new(2, 1)), Some(Terrain::Empty));
        assert_eq!(state.unknown_count(), 15);
    }

    #[test]
    fn test_build_rejects_oversized_dimensions() {
        let result = ArenaState::builder(65536, 65536).build();
        assert_eq!(
            result.unwrap_err(),
            ArenaError::TooLarge {
                width: 65536,
                height: 65536
            }
        );
        assert!(matches!(
            ArenaState::builder(i32::MAX, 2).build(),
            Err(ArenaError::TooLarge { .. })
        ));
        assert!(matches!(
            ArenaState::builder(0, 5).build(),
            Err(ArenaError::EmptyArena { .. })
        ));
        assert!(ArenaState::builder(1024, 1024).build().is_ok());
    }

    #[test]
    fn test_last_seen_and_initiative() {
        let state = ArenaState::builder(3, 1)
            .fill(Terrain::Empty)
            .seen(Position::new(2, 0), 7)
            .initiative(true)
            .build()
            .unwrap();
        assert_eq!(state.last_seen(&Position::new(2, 0)), Some(7));
        assert_eq!(state.last_seen(&Position::new(1, 0)), None);
        assert_eq!(state.last_seen(&Position::new(5, 0)), None);
        assert!(state.initiative());
    }

    #[test]
    fn test_draw_ascii_map() {
        let state = ArenaState::builder(3, 2)
            .fill(Terrain::Empty)
            .wall(Position::new(1, 0))
            .terrain(Position::new(2, 1), Terrain::Unknown)
            .agent(Position::new(0, 0))
            .gem(Position::new(0, 1), Some(5))
            .enemy(Position::new(1, 1))
            .build()
            .unwrap();
        assert_eq!(state.draw_ascii_map(), "A#.\nGE?");
    }
}
