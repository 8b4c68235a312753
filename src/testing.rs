//! Arena fixtures for tests: ASCII art parsing and seeded random arenas.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::ArenaError;
use crate::infra::Position;
use crate::state::{ArenaState, Terrain};

/// Builds an arena from rows of ASCII art.
///
/// `#` wall, `.` empty, `?` unknown, `A` agent, `G` gem, `E` enemy.
/// Gems and enemies stand on empty cells and carry no TTL.
pub fn try_parse_arena(rows: &[&str]) -> Result<ArenaState, ArenaError> {
    let height = rows.len() as i32;
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
    let mut builder = ArenaState::builder(width, height).fill(Terrain::Empty);

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let pos = Position::new(x as i32, y as i32);
            builder = match ch {
                '#' => builder.wall(pos),
                '?' => builder.terrain(pos, Terrain::Unknown),
                'A' => builder.agent(pos),
                'G' => builder.gem(pos, None),
                'E' => builder.enemy(pos),
                _ => builder,
            };
        }
    }

    builder.build()
}

/// Panicking variant of [`try_parse_arena`] for test fixtures.
pub fn parse_arena(rows: &[&str]) -> ArenaState {
    match try_parse_arena(rows) {
        Ok(state) => state,
        Err(err) => panic!("invalid arena fixture: {}", err),
    }
}

/// Seeded random arena generator covering the usual edge cases: no gems,
/// an agent walled in on every side, and arenas that are mostly unknown.
#[derive(Debug, Clone)]
pub struct SyntheticArena {
    width: i32,
    height: i32,
    seed: u64,
    wall_density: f64,
    unknown_density: f64,
    gems: usize,
    gem_ttl: Option<i32>,
    enemies: usize,
    enclose_agent: bool,
}

impl SyntheticArena {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            seed: 0,
            wall_density: 0.0,
            unknown_density: 0.0,
            gems: 0,
            gem_ttl: None,
            enemies: 0,
            enclose_agent: false,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn wall_density(mut self, density: f64) -> Self {
        self.wall_density = density.clamp(0.0, 1.0);
        self
    }

    pub fn unknown_density(mut self, density: f64) -> Self {
        self.unknown_density = density.clamp(0.0, 1.0);
        self
    }

    pub fn gems(mut self, count: usize) -> Self {
        self.gems = count;
        self
    }

    pub fn gem_ttl(mut self, ttl: i32) -> Self {
        self.gem_ttl = Some(ttl);
        self
    }

    pub fn enemies(mut self, count: usize) -> Self {
        self.enemies = count;
        self
    }

    /// Surround the agent with walls on all four sides.
    pub fn enclose_agent(mut self) -> Self {
        self.enclose_agent = true;
        self
    }

    pub fn build(&self) -> ArenaState {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let agent = Position::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        );

        let mut builder = ArenaState::builder(self.width, self.height)
            .fill(Terrain::Empty)
            .agent(agent);
        let mut open = Vec::new();

        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if pos == agent {
                    continue;
                }
                let terrain = if self.enclose_agent && pos.is_adjacent(&agent) {
                    Terrain::Wall
                } else if rng.random_bool(self.wall_density) {
                    Terrain::Wall
                } else if rng.random_bool(self.unknown_density) {
                    Terrain::Unknown
                } else {
                    Terrain::Empty
                };
                if terrain != Terrain::Wall {
                    open.push(pos);
                }
                builder = builder.terrain(pos, terrain);
            }
        }

        open.shuffle(&mut rng);
        let mut free = open.into_iter();
        for pos in free.by_ref().take(self.gems) {
            builder = builder.gem(pos, self.gem_ttl);
        }
        for pos in free.take(self.enemies) {
            builder = builder.enemy(pos);
        }

        match builder.build() {
            Ok(state) => state,
            Err(err) => panic!("synthetic arena violated its own invariants: {}", err),
        }
    }
}
