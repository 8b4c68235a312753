use tracing::debug;

use crate::config::BotConfig;
use crate::infra::Position;
use crate::planners::context::TurnContext;
use crate::planners::evaluators::{
    CandidateMove, CenterBias, CompositeScorer, EnemyDanger, TargetProximity,
};
use crate::planners::strategies::Planner;
use crate::state::Terrain;

/// Revisits the known floor cell that has gone unobserved the longest.
///
/// Gems spawn on floor the agent cannot currently see, so the stalest reachable
/// floor cell is where a new one is most likely to be waiting. Ties go to the
/// nearer cell. Without any last-seen data the agent drifts to the center.
pub struct OldestFloorPatrol {
    target_weight: f64,
    danger_weight: f64,
    danger: EnemyDanger,
    search: CompositeScorer,
}

impl OldestFloorPatrol {
    pub fn new(config: &BotConfig) -> Self {
        let weights = config.weights;
        Self {
            target_weight: weights.exploration,
            danger_weight: weights.danger,
            danger: EnemyDanger::new(config.threat_radius),
            search: CompositeScorer::new()
                .with(CenterBias, weights.center)
                .with(EnemyDanger::new(config.threat_radius), weights.danger),
        }
    }

    /// Reachable floor cell with the oldest last-seen tick, other than the agent's own.
    pub fn patrol_target(&self, ctx: &TurnContext) -> Option<Position> {
        let state = ctx.state();
        let agent = ctx.agent();
        ctx.agent_distances()
            .reachable()
            .filter(|(pos, _)| *pos != agent && state.terrain_at(pos) == Some(Terrain::Empty))
            .filter_map(|(pos, distance)| Some((state.last_seen(&pos)?, distance, pos)))
            .min()
            .map(|(_, _, pos)| pos)
    }
}

impl Planner for OldestFloorPatrol {
    fn name(&self) -> &'static str {
        "oldest_floor_patrol"
    }

    #[tracing::instrument(level = "debug", skip(self, ctx), fields(strategy = "OldestFloorPatrol"))]
    fn rank(&self, ctx: &TurnContext) -> Vec<CandidateMove> {
        let ranked = match self.patrol_target(ctx) {
            Some(target) => {
                debug!(
                    "Patrolling to {} (last seen at tick {:?})",
                    target,
                    ctx.state().last_seen(&target)
                );
                let field = ctx.pathfinder().distance_field(target, ctx.grid());
                CompositeScorer::new()
                    .with(TargetProximity::new(field), self.target_weight)
                    .with(EnemyDanger::new(self.danger.threat_radius()), self.danger_weight)
                    .rank(ctx)
            }
            None => {
                debug!("No floor cell to revisit, moving toward center");
                self.search.rank(ctx)
            }
        };
        self.danger.prefer_safe(ctx, ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Move;
    use crate::state::ArenaState;
    use crate::testing::parse_arena;

    fn corridor(agent: i32, seen: &[u32]) -> ArenaState {
        let mut builder = ArenaState::builder(seen.len() as i32, 1)
            .fill(Terrain::Empty)
            .agent(Position::new(agent, 0));
        for (x, tick) in seen.iter().enumerate() {
            builder = builder.seen(Position::new(x as i32, 0), *tick);
        }
        builder.build().unwrap()
    }

    fn plan(state: &ArenaState) -> Move {
        let config = BotConfig::default();
        let ctx = TurnContext::new(state, config.pathfinder());
        OldestFloorPatrol::new(&config).plan(&ctx)
    }

    #[test]
    fn test_heads_for_oldest_floor() {
        let state = corridor(2, &[5, 5, 5, 5, 2]);
        let config = BotConfig::default();
        let ctx = TurnContext::new(&state, config.pathfinder());
        assert_eq!(
            OldestFloorPatrol::new(&config).patrol_target(&ctx),
            Some(Position::new(4, 0))
        );
        assert_eq!(plan(&state), Move::Right);
    }

    #[test]
    fn test_ties_go_to_nearer_cell() {
        assert_eq!(plan(&corridor(1, &[1, 3, 3, 3, 1])), Move::Left);
    }

    #[test]
    fn test_agent_cell_is_never_the_target() {
        // The agent's own cell is the stalest, the next oldest is to the right.
        assert_eq!(plan(&corridor(0, &[0, 4, 3])), Move::Right);
    }

    #[test]
    fn test_walled_off_floor_is_ignored() {
        let state = ArenaState::builder(4, 1)
            .fill(Terrain::Empty)
            .wall(Position::new(2, 0))
            .agent(Position::new(1, 0))
            .seen(Position::new(0, 0), 6)
            .seen(Position::new(1, 0), 6)
            .seen(Position::new(3, 0), 1)
            .build()
            .unwrap();
        assert_eq!(plan(&state), Move::Left);
    }

    #[test]
    fn test_center_without_last_seen_data() {
        let state = parse_arena(&[
            "A..", //
            "...", //
            "...",
        ]);
        assert_eq!(plan(&state), Move::Down);
    }
}
