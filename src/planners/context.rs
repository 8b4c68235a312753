use std::cell::OnceCell;

use crate::infra::{DistanceField, Move, Pathfinder, Position};
use crate::state::{ArenaState, Gem, GridIndex, Terrain};

/// Everything a planner may look at during one turn.
///
/// BFS fields are computed lazily, at most once per turn, and shared by every
/// evaluator that needs them.
pub struct TurnContext<'a> {
    state: &'a ArenaState,
    grid: GridIndex<'a>,
    pathfinder: Pathfinder,
    agent_field: OnceCell<DistanceField>,
    reachable_gems: OnceCell<Vec<Gem>>,
    gem_field: OnceCell<Option<DistanceField>>,
    enemy_field: OnceCell<Option<DistanceField>>,
    center_field: OnceCell<DistanceField>,
    frontier_field: OnceCell<Option<DistanceField>>,
}

impl<'a> TurnContext<'a> {
    pub fn new(state: &'a ArenaState, pathfinder: Pathfinder) -> Self {
        Self {
            state,
            grid: GridIndex::new(state),
            pathfinder,
            agent_field: OnceCell::new(),
            reachable_gems: OnceCell::new(),
            gem_field: OnceCell::new(),
            enemy_field: OnceCell::new(),
            center_field: OnceCell::new(),
            frontier_field: OnceCell::new(),
        }
    }

    pub fn state(&self) -> &'a ArenaState {
        self.state
    }

    pub fn grid(&self) -> &GridIndex<'a> {
        &self.grid
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn agent(&self) -> Position {
        self.state.agent()
    }

    /// Legal moves with their destination, in tie-break order (stay last).
    pub fn legal_moves(&self) -> Vec<(Move, Position)> {
        let agent = self.agent();
        Move::ALL
            .into_iter()
            .map(|mv| (mv, agent.step(mv)))
            .filter(|(_, cell)| self.grid.is_legal_destination(*cell))
            .collect()
    }

    pub fn agent_distances(&self) -> &DistanceField {
        self.agent_field
            .get_or_init(|| self.pathfinder.distance_field(self.agent(), &self.grid))
    }

    /// Known gems the agent can reach before their TTL runs out.
    pub fn reachable_gems(&self) -> &[Gem] {
        self.reachable_gems.get_or_init(|| {
            let field = self.agent_distances();
            self.state
                .gems()
                .iter()
                .filter(|gem| match field.get(gem.position).get() {
                    Some(steps) => gem.ttl.is_none_or(|ttl| steps as i64 <= ttl as i64),
                    None => false,
                })
                .copied()
                .collect()
        })
    }

    pub fn has_reachable_gem(&self) -> bool {
        !self.reachable_gems().is_empty()
    }

    /// Distance to the nearest reachable gem; `None` when there is no gem signal.
    pub fn gem_distances(&self) -> Option<&DistanceField> {
        self.gem_field
            .get_or_init(|| {
                let sources: Vec<Position> =
                    self.reachable_gems().iter().map(|g| g.position).collect();
                (!sources.is_empty())
                    .then(|| self.pathfinder.multi_source_distance(&sources, &self.grid))
            })
            .as_ref()
    }

    /// Path distance from the nearest known enemy.
    pub fn enemy_distances(&self) -> Option<&DistanceField> {
        self.enemy_field
            .get_or_init(|| {
                let enemies = self.state.enemies();
                (!enemies.is_empty())
                    .then(|| self.pathfinder.multi_source_distance(enemies, &self.grid))
            })
            .as_ref()
    }

    pub fn center_distances(&self) -> &DistanceField {
        self.center_field
            .get_or_init(|| self.pathfinder.distance_field(self.state.center(), &self.grid))
    }

    /// Distance to the nearest unknown cell; `None` once the whole arena is known.
    pub fn frontier_distances(&self) -> Option<&DistanceField> {
        self.frontier_field
            .get_or_init(|| {
                let unknown: Vec<Position> = self
                    .state
                    .positions()
                    .filter(|pos| self.state.terrain_at(pos) == Some(Terrain::Unknown))
                    .collect();
                (!unknown.is_empty())
                    .then(|| self.pathfinder.multi_source_distance(&unknown, &self.grid))
            })
            .as_ref()
    }
}
