use std::collections::VecDeque;
use std::fmt;

use tracing::{trace, warn};

use crate::infra::Position;
use crate::state::{GridIndex, Terrain};

const NO_PARENT: usize = usize::MAX;

/// Path length in steps, with a sentinel for "no path".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(u32);

impl Distance {
    pub const ZERO: Distance = Distance(0);
    pub const INFINITE: Distance = Distance(u32::MAX);

    pub fn steps(steps: u32) -> Self {
        Distance(steps.min(u32::MAX - 1))
    }

    pub fn is_finite(self) -> bool {
        self != Distance::INFINITE
    }

    pub fn get(self) -> Option<u32> {
        self.is_finite().then_some(self.0)
    }

    fn next(self) -> Distance {
        Distance::steps(self.0.saturating_add(1))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(steps) => write!(f, "{}", steps),
            None => f.write_str("inf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResult {
    /// Source to target inclusive; a single cell when they coincide.
    Found(Vec<Position>),
    Unreachable,
}

impl PathResult {
    pub fn cells(&self) -> Option<&[Position]> {
        match self {
            PathResult::Found(path) => Some(path),
            PathResult::Unreachable => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, PathResult::Unreachable)
    }

    pub fn distance(&self) -> Distance {
        match self {
            PathResult::Found(path) => Distance::steps(path.len() as u32 - 1),
            PathResult::Unreachable => Distance::INFINITE,
        }
    }
}

/// How BFS treats cells that were never observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPolicy {
    /// Unknown cells are assumed open (exploration mode).
    #[default]
    Optimistic,
    /// Unknown cells block movement.
    Strict,
}

impl UnknownPolicy {
    pub fn from_traversable(unknown_traversable: bool) -> Self {
        if unknown_traversable {
            UnknownPolicy::Optimistic
        } else {
            UnknownPolicy::Strict
        }
    }
}

/// Distances from a set of sources to every cell of the arena.
#[derive(Debug, Clone)]
pub struct DistanceField {
    width: i32,
    height: i32,
    distances: Vec<Distance>,
}

impl DistanceField {
    pub fn get(&self, pos: Position) -> Distance {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return Distance::INFINITE;
        }
        self.distances[(pos.y * self.width + pos.x) as usize]
    }

    pub fn reachable(&self) -> impl Iterator<Item = (Position, Distance)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .map(|(i, d)| (Position::new(i as i32 % self.width, i as i32 / self.width), *d))
    }
}

/// Breadth-first search over a [`GridIndex`].
///
/// Neighbours are always visited up, down, left, right, so among equally short
/// paths the first one discovered in that order wins and results are deterministic.
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder {
    policy: UnknownPolicy,
    search_limit: usize,
}

impl Pathfinder {
    pub const DEFAULT_SEARCH_LIMIT: usize = 1_000_000;

    pub fn new(policy: UnknownPolicy, search_limit: usize) -> Self {
        Self {
            policy,
            search_limit: search_limit.max(1),
        }
    }

    pub fn policy(&self) -> UnknownPolicy {
        self.policy
    }

    /// Whether a path may enter `pos`.
    pub fn is_passable(&self, grid: &GridIndex, pos: &Position) -> bool {
        match grid.state().terrain_at(pos) {
            Some(Terrain::Empty) => true,
            Some(Terrain::Unknown) => self.policy == UnknownPolicy::Optimistic,
            Some(Terrain::Wall) | None => false,
        }
    }

    pub fn shortest_path(&self, source: Position, target: Position, grid: &GridIndex) -> PathResult {
        let state = grid.state();
        let (Some(source_index), Some(target_index)) = (state.index(&source), state.index(&target))
        else {
            trace!("Path {} -> {} leaves the arena", source, target);
            return PathResult::Unreachable;
        };

        if source == target {
            return PathResult::Found(vec![source]);
        }
        if !self.is_passable(grid, &target) {
            return PathResult::Unreachable;
        }

        let mut parents = vec![NO_PARENT; state.cell_count()];
        let mut visited = vec![false; state.cell_count()];
        let mut queue = VecDeque::new();
        visited[source_index] = true;
        queue.push_back(source);

        let mut expansions = 0;
        while let Some(current) = queue.pop_front() {
            expansions += 1;
            if expansions > self.search_limit {
                warn!(
                    "Path search {} -> {} hit the limit of {} expansions",
                    source, target, self.search_limit
                );
                return PathResult::Unreachable;
            }

            let current_index = (current.y * state.width() + current.x) as usize;
            for neighbor in grid.open_neighbors(current) {
                if !self.is_passable(grid, &neighbor) {
                    continue;
                }
                let neighbor_index = (neighbor.y * state.width() + neighbor.x) as usize;
                if visited[neighbor_index] {
                    continue;
                }
                visited[neighbor_index] = true;
                parents[neighbor_index] = current_index;
                if neighbor_index == target_index {
                    return PathResult::Found(reconstruct_path(grid, &parents, target_index));
                }
                queue.push_back(neighbor);
            }
        }

        PathResult::Unreachable
    }

    /// Path length minus one, or [`Distance::INFINITE`].
    pub fn distance(&self, source: Position, target: Position, grid: &GridIndex) -> Distance {
        self.shortest_path(source, target, grid).distance()
    }

    /// One simultaneous BFS from every source. Each cell gets the distance to its
    /// nearest source. Sources are seeded regardless of their own terrain so that
    /// unknown frontier cells can act as sources in strict mode.
    pub fn multi_source_distance(&self, sources: &[Position], grid: &GridIndex) -> DistanceField {
        let state = grid.state();
        let mut distances = vec![Distance::INFINITE; state.cell_count()];
        let mut queue = VecDeque::new();

        for source in sources {
            if let Some(index) = state.index(source)
                && distances[index] != Distance::ZERO
            {
                distances[index] = Distance::ZERO;
                queue.push_back(*source);
            }
        }

        let mut expansions = 0;
        while let Some(current) = queue.pop_front() {
            expansions += 1;
            if expansions > self.search_limit {
                warn!(
                    "Distance field from {} sources hit the limit of {} expansions",
                    sources.len(),
                    self.search_limit
                );
                break;
            }

            let next = distances[(current.y * state.width() + current.x) as usize].next();
            for neighbor in grid.open_neighbors(current) {
                if !self.is_passable(grid, &neighbor) {
                    continue;
                }
                let index = (neighbor.y * state.width() + neighbor.x) as usize;
                if distances[index].is_finite() {
                    continue;
                }
                distances[index] = next;
                queue.push_back(neighbor);
            }
        }

        DistanceField {
            width: state.width(),
            height: state.height(),
            distances,
        }
    }

    pub fn distance_field(&self, source: Position, grid: &GridIndex) -> DistanceField {
        self.multi_source_distance(&[source], grid)
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(UnknownPolicy::default(), Self::DEFAULT_SEARCH_LIMIT)
    }
}

fn reconstruct_path(grid: &GridIndex, parents: &[usize], target_index: usize) -> Vec<Position> {
    let state = grid.state();
    let mut path = vec![state.position_of(target_index)];
    let mut current = target_index;
    while parents[current] != NO_PARENT {
        current = parents[current];
        path.push(state.position_of(current));
    }
    path.reverse();
    path
}
